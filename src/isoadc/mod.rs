//! Driver for the Texas Instruments AMC131M03, a three-channel isolated delta-sigma ADC with an
//! integrated DC/DC converter (MikroE ISO ADC 5 click).
//!
//! ```
//! # use click_drivers::isoadc::{Amc131m0x, Gain};
//! # use click_drivers::isoadc::interface::noop::NoopInterface;
//! # use click_drivers::noop::NoopDelay;
//! # fn main() -> Result<(), click_drivers::isoadc::Error<core::convert::Infallible>> {
//! let mut adc = Amc131m0x::new(NoopInterface, NoopDelay);
//! adc.init()?;
//! adc.set_gain(1, Gain::X4)?;
//! let millivolts = adc.read_millivolts(1, 10)?;
//! # let _ = millivolts;
//! # Ok(())
//! # }
//! ```

use hal::blocking::delay::{DelayMs, DelayUs};
use log::{debug, trace, warn};

pub mod interface;
pub mod registers;

use self::interface::FrameInterface;
pub use self::registers::Register;
use self::registers::{response, sample, Command, Frame, RegisterAddress};

/// Number of input channels.
pub const CHANNELS: u8 = 3;
/// Internal reference in millivolts; a full-scale code corresponds to this input.
pub const VREF_MILLIVOLTS: f32 = 1200.0;

const FULL_SCALE: f32 = 32768.0;
const RESET_HOLD_MS: u32 = 10;
const SYNC_PULSE_US: u32 = 50;
const SAMPLE_INTERVAL_MS: u32 = 1;
const DCDC_EN: u16 = 0x0001;

/// Errors returned by the driver.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The transport failed.
    Interface(E),
    /// The DC/DC converter did not report enabled after `init`; the isolated side is unpowered.
    DcdcNotEnabled,
}

/// Programmable gain of one channel's amplifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gain {
    X1 = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
    X32 = 5,
    X64 = 6,
    X128 = 7,
}

impl Gain {
    const FIELD: u16 = 0b111;

    fn from_code(code: u16) -> Gain {
        use self::Gain::*;
        match code & Self::FIELD {
            0 => X1,
            1 => X2,
            2 => X4,
            3 => X8,
            4 => X16,
            5 => X32,
            6 => X64,
            _ => X128,
        }
    }

    /// The amplification factor.
    pub fn factor(self) -> u8 {
        1 << self as u8
    }
}

impl Default for Gain {
    fn default() -> Self {
        Gain::X1
    }
}

fn channel_index(channel: u8) -> usize {
    if channel < CHANNELS {
        channel as usize
    } else {
        warn!("amc131m0x: no channel {}, using 0", channel);
        0
    }
}

/// The AMC131M0x device.
pub struct Amc131m0x<EI, D> {
    iface: EI,
    delay: D,
}

impl<EI, D> Amc131m0x<EI, D>
where
    EI: FrameInterface,
    D: DelayMs<u32> + DelayUs<u32>,
{
    /// Create a new driver. No bus traffic happens until the first call; call `init` first.
    pub fn new(iface: EI, delay: D) -> Self {
        Self { iface, delay }
    }

    /// Release the interface and delay.
    pub fn release(self) -> (EI, D) {
        (self.iface, self.delay)
    }

    /// Reset the device and power its isolated side.
    pub fn init(&mut self) -> Result<(), Error<EI::Error>> {
        self.hardware_reset()?;
        self.write_register(Register::DcdcCtrl, DCDC_EN)?;
        let dcdc = self.read_register(Register::DcdcCtrl)?;
        if dcdc & DCDC_EN == 0 {
            warn!("amc131m0x: DC/DC converter not enabled ({:#06x})", dcdc);
            return Err(Error::DcdcNotEnabled);
        }
        debug!("amc131m0x: DC/DC converter enabled");
        Ok(())
    }

    /// Pulse the reset line, returning every register to its power-on value.
    pub fn hardware_reset(&mut self) -> Result<(), Error<EI::Error>> {
        debug!("amc131m0x: hardware reset");
        self.iface.set_reset(true).map_err(Error::Interface)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.iface.set_reset(false).map_err(Error::Interface)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        Ok(())
    }

    fn exchange(&mut self, command: Command) -> Result<Frame, Error<EI::Error>> {
        let mut frame = command.encode();
        trace!("amc131m0x: frame out {:02x?}", frame);
        self.iface
            .transfer_frame(&mut frame)
            .map_err(Error::Interface)?;
        trace!("amc131m0x: frame in {:02x?}", frame);
        Ok(frame)
    }

    /// Read a register. Takes two frames: the value arrives in reply to the frame after the
    /// request.
    pub fn read_register(&mut self, reg: Register) -> Result<u16, Error<EI::Error>> {
        let addr = RegisterAddress::from(reg);
        self.exchange(Command::ReadRegister(addr))?;
        let frame = self.exchange(Command::Null)?;
        Ok(response(&frame))
    }

    /// Write a register.
    pub fn write_register(&mut self, reg: Register, value: u16) -> Result<(), Error<EI::Error>> {
        debug!("amc131m0x: write {:?} = {:#06x}", reg, value);
        self.exchange(Command::WriteRegister(reg.into(), value))
            .map(|_| ())
    }

    /// Clock out one frame and return the signed conversion result of every channel.
    pub fn read_raw(&mut self) -> Result<[i16; 3], Error<EI::Error>> {
        let frame = self.exchange(Command::Null)?;
        Ok([sample(&frame, 0), sample(&frame, 1), sample(&frame, 2)])
    }

    /// Average `samples` conversions of `channel`, 1 ms apart, and scale them to millivolts.
    /// A channel beyond the last is read as channel 0; zero samples reads one.
    pub fn read_millivolts(&mut self, channel: u8, samples: u16) -> Result<f32, Error<EI::Error>> {
        let ch = channel_index(channel);
        let samples = samples.max(1);
        let mut sum: i64 = 0;
        for _ in 0..samples {
            sum += i64::from(self.read_raw()?[ch]);
            self.delay.delay_ms(SAMPLE_INTERVAL_MS);
        }
        let average = sum as f32 / f32::from(samples);
        Ok(average / FULL_SCALE * VREF_MILLIVOLTS)
    }

    /// Like `read_millivolts`, in volts.
    pub fn read_volts(&mut self, channel: u8, samples: u16) -> Result<f32, Error<EI::Error>> {
        self.read_millivolts(channel, samples).map(|mv| mv / 1000.0)
    }

    /// Set the amplifier gain of `channel`, leaving the other channels as they are.
    pub fn set_gain(&mut self, channel: u8, gain: Gain) -> Result<(), Error<EI::Error>> {
        let shift = 4 * channel_index(channel);
        let current = self.read_register(Register::Gain)?;
        let value = (current & !(Gain::FIELD << shift)) | ((gain as u16) << shift);
        self.write_register(Register::Gain, value)
    }

    /// The amplifier gain of `channel`.
    pub fn gain(&mut self, channel: u8) -> Result<Gain, Error<EI::Error>> {
        let shift = 4 * channel_index(channel);
        let value = self.read_register(Register::Gain)?;
        Ok(Gain::from_code(value >> shift))
    }

    /// Pulse the sync line to realign the conversion phase of all channels.
    pub fn sync(&mut self) -> Result<(), Error<EI::Error>> {
        self.iface.set_sync(true).map_err(Error::Interface)?;
        self.delay.delay_us(SYNC_PULSE_US);
        self.iface.set_sync(false).map_err(Error::Interface)
    }
}
