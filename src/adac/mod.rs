//! Driver for the Analog Devices AD5593R, an 8-channel I2C pin expander in which every pin can be
//! a 12-bit DAC output, a 12-bit ADC input, or a GPIO (MikroE ADAC click).
//!
//! ```
//! # use click_drivers::adac::{Adac, PinMode, Reference};
//! # use click_drivers::adac::interface::noop::NoopInterface;
//! # fn main() -> Result<(), core::convert::Infallible> {
//! let mut adac = Adac::new(NoopInterface, Reference::default());
//! adac.reset()?;
//! adac.configure()
//!     .pin(0, PinMode::Output)
//!     .pin(3, PinMode::Dac)
//!     .pin(4, PinMode::Adc)
//!     .commit()?;
//! adac.set_output(0, true)?;
//! adac.set_dac_millivolts(3, 20)?;
//! let millivolts = adac.read_adc_millivolts(4, 3)?;
//! # let _ = millivolts;
//! # Ok(())
//! # }
//! ```

use log::{debug, warn};

pub mod config;
pub mod interface;
pub mod pin;
pub mod registers;

pub use self::config::{AdcRange, Configurator, PinMode, Reference, ThreeState};
use self::interface::AdacInterface;
pub use self::pin::{AdacIO, IoPin};
use self::registers::{
    valid_pin, Command, ControlRegister, ADC_SEQ_REPEAT, GP_ADC_RANGE, PD_ALL, PD_EN_REF,
    SOFT_RESET_KEY,
};
use crate::mutex::IOMutex;

/// Full-scale code of the 12-bit DAC.
pub const DAC_MAX: u16 = 0x0FFF;

/// The AD5593R device.
pub struct Adac<EI> {
    iface: EI,
    pub(crate) reference: Reference,
    adc_range: AdcRange,
}

impl<EI: AdacInterface> Adac<EI> {
    /// Create a new `Adac` communicating through `iface`, with DAC and ADC scaling based on
    /// `reference`. No bus traffic happens until the first call.
    pub fn new(iface: EI, reference: Reference) -> Self {
        Self {
            iface,
            reference,
            adc_range: AdcRange::default(),
        }
    }

    /// Release the interface.
    pub fn release(self) -> EI {
        self.iface
    }

    /// Begin configuring pin modes and ranges. See [`Configurator`].
    pub fn configure(&mut self) -> Configurator<'_, EI> {
        Configurator::new(self)
    }

    /// Convert this device into an I/O adapter handing out `embedded-hal` pins. See [`AdacIO`].
    pub fn into_io<M: IOMutex<Self>>(self) -> AdacIO<M, EI> {
        AdacIO::new(self)
    }

    /// Issue a software reset, returning every register to its power-on value.
    ///
    /// The device resets as soon as it has seen the reset key and may not acknowledge the end of
    /// the write, so a bus error from this write is logged and otherwise ignored.
    pub fn reset(&mut self) -> Result<(), EI::Error> {
        debug!("ad5593r: soft reset");
        if self
            .write_register(ControlRegister::SoftReset, SOFT_RESET_KEY)
            .is_err()
        {
            warn!("ad5593r: soft reset write not acknowledged");
        }
        self.adc_range = AdcRange::default();
        Ok(())
    }

    /// Write a control register.
    pub fn write_register(&mut self, reg: ControlRegister, value: u16) -> Result<(), EI::Error> {
        self.iface
            .write_register(Command::Configure(reg).into(), value)
    }

    /// Read back a control register.
    pub fn read_register(&mut self, reg: ControlRegister) -> Result<u16, EI::Error> {
        self.iface
            .read_register(Command::RegisterReadback(reg).into())
    }

    pub(crate) fn modify_register(
        &mut self,
        reg: ControlRegister,
        f: impl FnOnce(u16) -> u16,
    ) -> Result<(), EI::Error> {
        let current = self.read_register(reg)?;
        self.write_register(reg, f(current))
    }

    /// Enable or disable the internal 2.5 V reference.
    pub fn set_internal_reference(&mut self, enable: bool) -> Result<(), EI::Error> {
        debug!("ad5593r: internal reference {}", enable);
        self.modify_register(ControlRegister::PowerDownRef, |cur| {
            if enable {
                cur | PD_EN_REF
            } else {
                cur & !PD_EN_REF
            }
        })
    }

    /// Power every channel and the reference up (`true`) or down (`false`).
    pub fn power_all(&mut self, on: bool) -> Result<(), EI::Error> {
        debug!("ad5593r: power {}", if on { "up" } else { "down" });
        self.modify_register(ControlRegister::PowerDownRef, |cur| {
            if on {
                cur & !PD_ALL
            } else {
                cur | PD_ALL
            }
        })
    }

    /// Select the ADC input range.
    pub fn set_adc_range(&mut self, range: AdcRange) -> Result<(), EI::Error> {
        self.modify_register(ControlRegister::GeneralControl, |cur| match range {
            AdcRange::Vref => cur & !GP_ADC_RANGE,
            AdcRange::TwiceVref => cur | GP_ADC_RANGE,
        })?;
        self.adc_range = range;
        Ok(())
    }

    /// Read the ADC input range from the device.
    pub fn read_adc_range(&mut self) -> Result<AdcRange, EI::Error> {
        let control = self.read_register(ControlRegister::GeneralControl)?;
        Ok(if control & GP_ADC_RANGE != 0 {
            AdcRange::TwiceVref
        } else {
            AdcRange::Vref
        })
    }

    /// The ADC full-scale input voltage in millivolts, given the reference and the range last
    /// selected through this driver.
    pub fn adc_full_scale_millivolts(&self) -> u16 {
        self.reference
            .millivolts()
            .saturating_mul(self.adc_range.multiplier())
    }

    /// Set a DAC pin's output to `millivolts`, clamped to the reference voltage.
    pub fn set_dac_millivolts(&mut self, pin: u8, millivolts: u16) -> Result<(), EI::Error> {
        let vref = u32::from(self.reference.millivolts()).max(1);
        let code = (u32::from(millivolts) * u32::from(DAC_MAX) / vref).min(u32::from(DAC_MAX));
        self.set_dac_code(pin, code as u16)
    }

    /// Set a DAC pin's raw 12-bit output code.
    pub fn set_dac_code(&mut self, pin: u8, code: u16) -> Result<(), EI::Error> {
        self.iface
            .write_register(Command::DacWrite(pin).into(), code & DAC_MAX)
    }

    /// Convert ADC pin `pin` `samples` times (at least once) and return the average in
    /// millivolts.
    pub fn read_adc_millivolts(&mut self, pin: u8, samples: u16) -> Result<f32, EI::Error> {
        let pin = valid_pin(pin);
        self.modify_register(ControlRegister::AdcSequence, |cur| {
            (cur & 0xFF00) | ADC_SEQ_REPEAT | (1 << pin)
        })?;
        let samples = samples.max(1);
        let mut sum = 0u32;
        for _ in 0..samples {
            let result = self.iface.read_register(Command::AdcReadback.into())?;
            sum += u32::from(result & 0x0FFF);
        }
        let average = sum / u32::from(samples);
        Ok(average as f32 / 4096.0 * f32::from(self.adc_full_scale_millivolts()))
    }

    /// As [`read_adc_millivolts`](Self::read_adc_millivolts), in volts.
    pub fn read_voltage(&mut self, pin: u8, samples: u16) -> Result<f32, EI::Error> {
        Ok(self.read_adc_millivolts(pin, samples)? / 1000.0)
    }

    /// Read the logic level on GPIO input `pin`.
    pub fn input_state(&mut self, pin: u8) -> Result<bool, EI::Error> {
        let pin = valid_pin(pin);
        let levels = self.iface.read_register(Command::GpioReadback.into())?;
        Ok((levels >> pin) & 0x01 == 1)
    }

    /// The level last written to GPIO output `pin`.
    pub fn output_state(&mut self, pin: u8) -> Result<bool, EI::Error> {
        let pin = valid_pin(pin);
        let data = self.read_register(ControlRegister::GpioWriteData)?;
        Ok((data >> pin) & 0x01 == 1)
    }

    /// Drive GPIO output `pin` high (`true`) or low.
    pub fn set_output(&mut self, pin: u8, high: bool) -> Result<(), EI::Error> {
        let bit = 1u16 << valid_pin(pin);
        self.modify_register(ControlRegister::GpioWriteData, |cur| {
            if high {
                (cur & 0x00FF) | bit
            } else {
                cur & 0x00FF & !bit
            }
        })
    }

    /// Invert GPIO output `pin`.
    pub fn toggle(&mut self, pin: u8) -> Result<(), EI::Error> {
        let bit = 1u16 << valid_pin(pin);
        self.modify_register(ControlRegister::GpioWriteData, |cur| (cur & 0x00FF) ^ bit)
    }

    /// Put a three-state pin into high impedance, or drive it to a level.
    pub fn set_three_state(&mut self, pin: u8, state: ThreeState) -> Result<(), EI::Error> {
        let bit = 1u16 << valid_pin(pin);
        match state {
            ThreeState::HighImpedance => {
                self.modify_register(ControlRegister::ThreeStateConfig, |cur| cur | bit)
            }
            ThreeState::Low | ThreeState::High => {
                self.modify_register(ControlRegister::ThreeStateConfig, |cur| cur & !bit)?;
                self.set_output(pin, state == ThreeState::High)
            }
        }
    }
}
