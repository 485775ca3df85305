//! Abstractions used to configure the AD5593R pins and reference.

use crate::adac::interface::AdacInterface;
use crate::adac::registers::{valid_pin, ControlRegister};
use crate::adac::Adac;
use log::debug;

/// The function a pin is assigned to. Each mode has its own pin-config register holding one bit
/// per pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Push-pull GPIO output.
    Output,
    /// GPIO input.
    Input,
    /// DAC output.
    Dac,
    /// ADC input.
    Adc,
    /// Three-state capable GPIO.
    ThreeState,
}

impl PinMode {
    const ALL: [PinMode; 5] = [
        PinMode::Output,
        PinMode::Input,
        PinMode::Dac,
        PinMode::Adc,
        PinMode::ThreeState,
    ];

    /// The pin-config register for this mode.
    pub fn register(self) -> ControlRegister {
        match self {
            PinMode::Output => ControlRegister::GpioWriteConfig,
            PinMode::Input => ControlRegister::GpioReadConfig,
            PinMode::Dac => ControlRegister::DacPinConfig,
            PinMode::Adc => ControlRegister::AdcPinConfig,
            PinMode::ThreeState => ControlRegister::ThreeStateConfig,
        }
    }
}

/// ADC input range, selected by bit 5 of the general purpose control register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcRange {
    /// 0 V to Vref.
    Vref,
    /// 0 V to 2 x Vref.
    TwiceVref,
}

impl AdcRange {
    pub(crate) fn multiplier(self) -> u16 {
        match self {
            AdcRange::Vref => 1,
            AdcRange::TwiceVref => 2,
        }
    }
}

impl Default for AdcRange {
    fn default() -> Self {
        AdcRange::Vref
    }
}

/// Where the DAC and ADC reference voltage comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reference {
    /// The on-chip 2.5 V reference, enabled when an ADC pin is configured.
    Internal,
    /// A reference applied to the VREF pin, in millivolts.
    External { millivolts: u16 },
}

impl Reference {
    /// Reference voltage in millivolts.
    pub fn millivolts(&self) -> u16 {
        match *self {
            Reference::Internal => 2500,
            Reference::External { millivolts } => millivolts,
        }
    }
}

impl Default for Reference {
    fn default() -> Self {
        Reference::External { millivolts: 5000 }
    }
}

/// Levels a three-state pin can be put in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreeState {
    Low,
    High,
    HighImpedance,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum MaskStatus {
    Unchanged,
    ReadModify,
    Overwrite,
}

fn mask_status(mask: u8) -> MaskStatus {
    match mask {
        0x00 => MaskStatus::Unchanged,
        0xFF => MaskStatus::Overwrite,
        _ => MaskStatus::ReadModify,
    }
}

/// A `Configurator` collects pin mode assignments and range settings, then commits them to the
/// AD5593R. Obtain one from [`Adac::configure`], chain calls and end with `commit()`.
///
/// ```
/// # use click_drivers::adac::{Adac, PinMode, AdcRange, Reference};
/// # use click_drivers::adac::interface::noop::NoopInterface;
/// let mut adac = Adac::new(NoopInterface, Reference::Internal);
/// adac.configure()
///     .pin(0, PinMode::Output)
///     .pin(1, PinMode::Input)
///     .pins(2..=3, PinMode::Dac)
///     .pin(4, PinMode::Adc)
///     .adc_range(AdcRange::TwiceVref)
///     .commit()
///     .unwrap();
/// ```
///
/// Modes are added on top of the device's existing configuration: a pin-config register that
/// only some pins were assigned to is read, modified and written back, one that all eight pins
/// were assigned to is overwritten, and the rest are not touched.
#[must_use = "Configuration changes are not applied unless committed"]
pub struct Configurator<'a, EI: AdacInterface> {
    adac: &'a mut Adac<EI>,
    masks: [u8; 5],
    adc_range: Option<AdcRange>,
}

impl<'a, EI: AdacInterface> Configurator<'a, EI> {
    pub(crate) fn new(adac: &'a mut Adac<EI>) -> Self {
        Self {
            adac,
            masks: [0; 5],
            adc_range: None,
        }
    }

    /// Assign `mode` to `pin` (`0..=7`).
    pub fn pin(mut self, pin: u8, mode: PinMode) -> Self {
        self.masks[mode as usize] |= 1 << valid_pin(pin);
        self
    }

    /// Assign `mode` to every pin yielded by `pins`.
    pub fn pins<I>(mut self, pins: I, mode: PinMode) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        for pin in pins {
            self.masks[mode as usize] |= 1 << valid_pin(pin);
        }
        self
    }

    /// Select the ADC input range.
    pub fn adc_range(mut self, range: AdcRange) -> Self {
        self.adc_range = Some(range);
        self
    }

    /// Write the collected configuration to the device.
    pub fn commit(self) -> Result<(), EI::Error> {
        for mode in PinMode::ALL.iter() {
            let mask = self.masks[*mode as usize];
            let reg = mode.register();
            match mask_status(mask) {
                MaskStatus::Unchanged => {}
                MaskStatus::Overwrite => {
                    debug!("ad5593r: all pins {:?}", mode);
                    self.adac.write_register(reg, 0x00FF)?;
                }
                MaskStatus::ReadModify => {
                    debug!("ad5593r: pins {:#010b} {:?}", mask, mode);
                    self.adac
                        .modify_register(reg, |cur| cur | mask as u16)?;
                }
            }
        }
        if self.masks[PinMode::Adc as usize] != 0 && self.adac.reference == Reference::Internal {
            self.adac.set_internal_reference(true)?;
        }
        if let Some(range) = self.adc_range {
            self.adac.set_adc_range(range)?;
        }
        Ok(())
    }
}
