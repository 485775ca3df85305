//! The seam between the buzzer driver and whatever generates the tone on DIN.

/// A square-wave output with adjustable frequency and duty cycle, usually a PWM channel.
pub trait ToneOutput {
    /// The type of error that the output may return.
    type Error;
    /// Set the output frequency in hertz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;
    /// Set the duty cycle, where `0` is always low and `u16::MAX` is always high.
    fn set_duty(&mut self, duty: u16) -> Result<(), Self::Error>;
}

#[doc(hidden)]
pub mod noop {
    use super::ToneOutput;

    pub struct NoopTone;

    impl ToneOutput for NoopTone {
        type Error = core::convert::Infallible;
        fn set_frequency(&mut self, _hz: u32) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_duty(&mut self, _duty: u16) -> Result<(), Self::Error> {
            Ok(())
        }
    }
}
