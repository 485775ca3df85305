//! `embedded-hal` GPIO pins backed by AD5593R I/O pins.
//!
//! Every trait method on an [`IoPin`] immediately performs the corresponding bus transaction,
//! with access to the device arbitrated by the adapter's mutex.

use core::marker::PhantomData;

#[cfg(feature = "unproven")]
use hal::digital::v2::{InputPin, StatefulOutputPin, ToggleableOutputPin};
use hal::digital::v2::OutputPin;

use crate::adac::interface::AdacInterface;
use crate::adac::registers::valid_pin;
use crate::adac::Adac;
use crate::mutex::IOMutex;

/// This I/O adapter captures the `Adac` and hands out GPIO pins implementing the `embedded-hal`
/// digital traits, so that drivers written against those traits can run through the AD5593R.
/// Configure the pins' modes before converting.
pub struct AdacIO<M, EI>(M, PhantomData<EI>)
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface;

impl<M, EI> AdacIO<M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    pub(crate) fn new(adac: Adac<EI>) -> Self {
        AdacIO(M::new(adac), PhantomData)
    }

    /// Create an `IoPin` for pin `pin` (`0..=7`) of the AD5593R.
    pub fn pin(&self, pin: u8) -> IoPin<'_, M, EI> {
        IoPin {
            io: self,
            pin: valid_pin(pin),
        }
    }

    /// Run `f` with exclusive access to the device, e.g. to read an ADC channel between pin
    /// operations.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut Adac<EI>) -> R) -> R {
        self.0.lock(f)
    }
}

/// A single AD5593R pin.
pub struct IoPin<'io, M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    io: &'io AdacIO<M, EI>,
    pin: u8,
}

impl<'io, M, EI> OutputPin for IoPin<'io, M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    type Error = EI::Error;

    fn set_high(&mut self) -> Result<(), EI::Error> {
        let pin = self.pin;
        self.io.0.lock(|ad| ad.set_output(pin, true))
    }
    fn set_low(&mut self) -> Result<(), EI::Error> {
        let pin = self.pin;
        self.io.0.lock(|ad| ad.set_output(pin, false))
    }
}

#[cfg(feature = "unproven")]
impl<'io, M, EI> InputPin for IoPin<'io, M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    type Error = EI::Error;

    fn is_high(&self) -> Result<bool, EI::Error> {
        let pin = self.pin;
        self.io.0.lock(|ad| ad.input_state(pin))
    }
    fn is_low(&self) -> Result<bool, EI::Error> {
        self.is_high().map(|high| !high)
    }
}

#[cfg(feature = "unproven")]
impl<'io, M, EI> StatefulOutputPin for IoPin<'io, M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    fn is_set_high(&self) -> Result<bool, EI::Error> {
        let pin = self.pin;
        self.io.0.lock(|ad| ad.output_state(pin))
    }
    fn is_set_low(&self) -> Result<bool, EI::Error> {
        self.is_set_high().map(|high| !high)
    }
}

#[cfg(feature = "unproven")]
impl<'io, M, EI> ToggleableOutputPin for IoPin<'io, M, EI>
where
    M: IOMutex<Adac<EI>>,
    EI: AdacInterface,
{
    type Error = EI::Error;

    fn toggle(&mut self) -> Result<(), EI::Error> {
        let pin = self.pin;
        self.io.0.lock(|ad| ad.toggle(pin))
    }
}
