//! Stand-in pins and delays for documentation examples.

use core::convert::Infallible;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;

pub struct NoopDelay;

impl DelayMs<u32> for NoopDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

impl DelayUs<u32> for NoopDelay {
    fn delay_us(&mut self, _us: u32) {}
}

pub struct NoopPin;

impl OutputPin for NoopPin {
    type Error = Infallible;
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
