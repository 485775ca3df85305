//! Shims between `embedded-hal` hardware and the bargraph's chain of SN74HC595 shift registers.

/// A transport for a chain of shift registers. Bytes written are shifted into the chain one at a
/// time; the chain also exposes its master-reset and output-enable lines.
pub trait ShiftRegisterInterface {
    /// The type of error that the transport may return.
    type Error;
    /// Shift `value` into the chain inside one chip-select frame.
    fn write_byte(&mut self, value: u8) -> Result<(), Self::Error>;
    /// Drive the (active low) master-reset line. `true` holds the registers in reset.
    fn set_master_reset(&mut self, asserted: bool) -> Result<(), Self::Error>;
    /// Drive the line that powers the LED outputs.
    fn set_output_enable(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

#[doc(hidden)]
pub mod noop {
    use super::ShiftRegisterInterface;

    pub struct NoopInterface;

    impl ShiftRegisterInterface for NoopInterface {
        type Error = core::convert::Infallible;
        fn write_byte(&mut self, _value: u8) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_master_reset(&mut self, _asserted: bool) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_output_enable(&mut self, _enabled: bool) -> Result<(), Self::Error> {
            Ok(())
        }
    }
}

pub mod spi {
    //! Drive the shift register chain from an SPI master (SCK, MOSI) plus three GPIO outputs for
    //! chip select/latch, master reset and output power.

    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::ShiftRegisterInterface;

    /// The union of all errors that may occur on the SPI interface.
    #[derive(Debug)]
    pub enum SpiInterfaceError<PE, WE> {
        /// The chip select GPIO threw an error.
        CSError(PE),
        /// The master reset GPIO threw an error.
        ResetError(PE),
        /// The output power GPIO threw an error.
        PowerError(PE),
        /// An error occurred during SPI write.
        WriteError(WE),
    }

    impl<PE, WE> SpiInterfaceError<PE, WE> {
        fn from_cs(e: PE) -> Self {
            Self::CSError(e)
        }
        fn from_reset(e: PE) -> Self {
            Self::ResetError(e)
        }
        fn from_power(e: PE) -> Self {
            Self::PowerError(e)
        }
        fn from_write(e: WE) -> Self {
            Self::WriteError(e)
        }
    }

    /// A configured `ShiftRegisterInterface` for a bargraph wired to an SPI bus.
    pub struct SpiInterface<SPI, CS, MR, PWR> {
        /// The SPI master device connected to the serial input of the chain.
        spi: SPI,
        /// GPIO connected to the storage register clock; the rising edge latches the outputs.
        cs: CS,
        /// GPIO connected to the active-low master reset of the chain.
        mr: MR,
        /// GPIO that powers the LEDs.
        pwr: PWR,
    }

    impl<SPI, CS, MR, PWR, PE> SpiInterface<SPI, CS, MR, PWR>
    where
        SPI: Write<u8>,
        CS: OutputPin<Error = PE>,
        MR: OutputPin<Error = PE>,
        PWR: OutputPin<Error = PE>,
    {
        /// Create a new SPI interface. `cs` should idle high, `mr` and `pwr` are driven only when
        /// the bargraph asks for a reset or a power change.
        pub fn new(spi: SPI, cs: CS, mr: MR, pwr: PWR) -> Self {
            Self { spi, cs, mr, pwr }
        }

        /// Give back the bus and pins.
        pub fn release(self) -> (SPI, CS, MR, PWR) {
            (self.spi, self.cs, self.mr, self.pwr)
        }
    }

    impl<SPI, CS, MR, PWR, PE> ShiftRegisterInterface for SpiInterface<SPI, CS, MR, PWR>
    where
        SPI: Write<u8>,
        CS: OutputPin<Error = PE>,
        MR: OutputPin<Error = PE>,
        PWR: OutputPin<Error = PE>,
    {
        type Error = SpiInterfaceError<PE, <SPI as Write<u8>>::Error>;

        fn write_byte(&mut self, value: u8) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(Self::Error::from_cs)?;
            let result = self.spi.write(&[value]);
            self.cs.set_high().map_err(Self::Error::from_cs)?;
            result.map_err(Self::Error::from_write)
        }

        fn set_master_reset(&mut self, asserted: bool) -> Result<(), Self::Error> {
            let result = if asserted {
                self.mr.set_low()
            } else {
                self.mr.set_high()
            };
            result.map_err(Self::Error::from_reset)
        }

        fn set_output_enable(&mut self, enabled: bool) -> Result<(), Self::Error> {
            let result = if enabled {
                self.pwr.set_high()
            } else {
                self.pwr.set_low()
            };
            result.map_err(Self::Error::from_power)
        }
    }
}
