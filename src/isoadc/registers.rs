//! Register addresses and SPI frame layout of the AMC131M0x.
//!
//! Every SPI transaction is one frame of five 24-bit words: a command (or, on the way back, the
//! response to the previous frame's command), three channel conversions, and a CRC word. At reset
//! the device uses 24-bit words carrying 16 bits of data in the upper two bytes.

/// Bytes per word.
pub const WORD_LEN: usize = 3;
/// Bytes per frame: command, three channels, CRC.
pub const FRAME_LEN: usize = 5 * WORD_LEN;

/// A full SPI frame.
pub type Frame = [u8; FRAME_LEN];

/// A register address within the AMC131M0x. Created by conversion from `Register`, which rejects
/// addresses beyond the 6-bit register space.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RegisterAddress(pub(crate) u8);

impl From<RegisterAddress> for u8 {
    fn from(addr: RegisterAddress) -> u8 {
        addr.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    Id,
    Status,
    Mode,
    Clock,
    /// Programmable gain, 3 bits per channel at bit `4 * channel`.
    Gain,
    Config,
    /// Bit 0 enables the integrated DC/DC converter powering the isolated side.
    DcdcCtrl,
    /// Any other register, by address (`0..=63`).
    Other(u8),
}

fn valid_address(addr: u8) -> u8 {
    match addr {
        0..=63 => addr,
        _ => panic!("AMC131M0x does not have register {:#04x}", addr),
    }
}

impl From<Register> for RegisterAddress {
    fn from(reg: Register) -> RegisterAddress {
        use self::Register::*;
        match reg {
            Id => RegisterAddress(0x00),
            Status => RegisterAddress(0x01),
            Mode => RegisterAddress(0x02),
            Clock => RegisterAddress(0x03),
            Gain => RegisterAddress(0x04),
            Config => RegisterAddress(0x06),
            DcdcCtrl => RegisterAddress(0x31),
            Other(addr) => RegisterAddress(valid_address(addr)),
        }
    }
}

/// The command word sent in the first word of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// No operation; the frame only clocks out conversion data.
    Null,
    /// Read one register. The value arrives in the response word of the *next* frame.
    ReadRegister(RegisterAddress),
    /// Write one register.
    WriteRegister(RegisterAddress, u16),
}

const OPCODE_RREG: u8 = 0b1010_0000;
const OPCODE_WREG: u8 = 0b0110_0000;

impl Command {
    /// Lay the command out as a full frame, zero-padded.
    pub fn encode(self) -> Frame {
        let mut frame = [0u8; FRAME_LEN];
        match self {
            Command::Null => {}
            Command::ReadRegister(addr) => {
                frame[0] = OPCODE_RREG | (addr.0 >> 1);
                frame[1] = (addr.0 & 1) << 7;
            }
            Command::WriteRegister(addr, value) => {
                // Register count field is zero: one register follows in the next word.
                frame[0] = OPCODE_WREG | (addr.0 >> 1);
                frame[1] = (addr.0 & 1) << 7;
                let [msb, lsb] = value.to_be_bytes();
                frame[WORD_LEN] = msb;
                frame[WORD_LEN + 1] = lsb;
            }
        }
        frame
    }
}

/// The 16-bit response word of a received frame.
pub fn response(frame: &Frame) -> u16 {
    u16::from_be_bytes([frame[0], frame[1]])
}

/// The signed conversion result of `channel` (`0..=2`) in a received frame.
pub fn sample(frame: &Frame, channel: usize) -> i16 {
    let base = (channel + 1) * WORD_LEN;
    i16::from_be_bytes([frame[base], frame[base + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_addresses() {
        assert_eq!(RegisterAddress::from(Register::Gain), RegisterAddress(0x04));
        assert_eq!(RegisterAddress::from(Register::DcdcCtrl), RegisterAddress(0x31));
        assert_eq!(RegisterAddress::from(Register::Other(63)), RegisterAddress(63));
    }

    #[test]
    #[should_panic]
    fn address_invalid() {
        RegisterAddress::from(Register::Other(64));
    }

    #[test]
    fn encode_read() {
        let frame = Command::ReadRegister(Register::DcdcCtrl.into()).encode();
        assert_eq!(frame[..3], [0b1011_1000, 0b1000_0000, 0]);
        assert!(frame[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_write() {
        let frame = Command::WriteRegister(Register::Gain.into(), 0x0203).encode();
        assert_eq!(frame[..6], [0b0110_0010, 0, 0, 0x02, 0x03, 0]);
        assert!(frame[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_null() {
        assert_eq!(Command::Null.encode(), [0u8; FRAME_LEN]);
    }

    #[test]
    fn decode_samples() {
        let mut frame = [0u8; FRAME_LEN];
        frame[3] = 0x01;
        frame[4] = 0x02;
        frame[6] = 0xFF;
        frame[7] = 0xFE;
        frame[9] = 0x80;
        assert_eq!(sample(&frame, 0), 0x0102);
        assert_eq!(sample(&frame, 1), -2);
        assert_eq!(sample(&frame, 2), i16::min_value());
    }

    #[test]
    fn decode_response() {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = 0x23;
        frame[1] = 0x10;
        assert_eq!(response(&frame), 0x2310);
    }
}
