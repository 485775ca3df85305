//! Pointer bytes and control registers of the AD5593R.
//!
//! Every I2C transaction starts with a pointer byte: the upper nibble selects the mode (control
//! register write, DAC write, or one of the readbacks) and the lower nibble the register or pin.

/// A pointer byte. These are created by conversion from `Command`, so an invalid register or pin
/// number cannot reach an `AdacInterface`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Pointer(pub(crate) u8);

impl From<Pointer> for u8 {
    fn from(pointer: Pointer) -> u8 {
        pointer.0
    }
}

/// The control registers, addressed in configuration mode and read back with
/// [`Command::RegisterReadback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlRegister {
    Nop = 0x0,
    /// Channels converted by ADC readback, plus the repeat (bit 9) and temperature (bit 8)
    /// flags.
    AdcSequence = 0x2,
    /// General purpose control: ADC range (bit 5) and DAC range (bit 4) among others.
    GeneralControl = 0x3,
    AdcPinConfig = 0x4,
    DacPinConfig = 0x5,
    PulldownConfig = 0x6,
    LdacMode = 0x7,
    GpioWriteConfig = 0x8,
    GpioWriteData = 0x9,
    GpioReadConfig = 0xA,
    /// Power-down and reference control: PD_ALL (bit 10), EN_REF (bit 9), per-DAC power-down.
    PowerDownRef = 0xB,
    OpenDrainConfig = 0xC,
    ThreeStateConfig = 0xD,
    SoftReset = 0xF,
}

/// An addressed operation on the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Write a control register.
    Configure(ControlRegister),
    /// Write the DAC data register of one pin.
    DacWrite(u8),
    /// Read the conversion results of the channels selected in `AdcSequence`.
    AdcReadback,
    /// Read the logic levels of the GPIO input pins.
    GpioReadback,
    /// Read back a control register.
    RegisterReadback(ControlRegister),
}

const MODE_CONFIG: u8 = 0b0000 << 4;
const MODE_DAC_WRITE: u8 = 0b0001 << 4;
const MODE_ADC_READBACK: u8 = 0b0100 << 4;
const MODE_GPIO_READBACK: u8 = 0b0110 << 4;
const MODE_REG_READBACK: u8 = 0b0111 << 4;

/// Repeat the ADC sequence on every readback.
pub const ADC_SEQ_REPEAT: u16 = 1 << 9;
/// ADC input range is 0 to 2 x Vref.
pub const GP_ADC_RANGE: u16 = 1 << 5;
/// Power down every channel and the reference.
pub const PD_ALL: u16 = 1 << 10;
/// Enable the internal 2.5 V reference.
pub const PD_EN_REF: u16 = 1 << 9;
/// The value which must be written to `SoftReset` to reset the device.
pub const SOFT_RESET_KEY: u16 = 0x0DAC;

/// Number of I/O pins.
pub const PIN_COUNT: u8 = 8;

pub(crate) fn valid_pin(pin: u8) -> u8 {
    match pin {
        0..=7 => pin,
        _ => panic!("AD5593R does not have pin {}", pin),
    }
}

impl From<Command> for Pointer {
    fn from(cmd: Command) -> Pointer {
        use self::Command::*;
        match cmd {
            Configure(reg) => Pointer(MODE_CONFIG | reg as u8),
            DacWrite(pin) => Pointer(MODE_DAC_WRITE | valid_pin(pin)),
            AdcReadback => Pointer(MODE_ADC_READBACK),
            GpioReadback => Pointer(MODE_GPIO_READBACK),
            RegisterReadback(reg) => Pointer(MODE_REG_READBACK | reg as u8),
        }
    }
}
