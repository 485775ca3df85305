//! Shims between `embedded-hal` I2C buses and the AD5593R's pointer-addressed registers.

use crate::adac::registers::Pointer;

/// An interface to the AD5593R, sending pre-encoded pointer bytes with 16-bit data words.
pub trait AdacInterface {
    /// The type of error that register reads and writes may return.
    type Error;
    /// Write the big-endian word `value` to the register selected by `pointer`.
    fn write_register(&mut self, pointer: Pointer, value: u16) -> Result<(), Self::Error>;
    /// Select `pointer` and read back one big-endian word.
    fn read_register(&mut self, pointer: Pointer) -> Result<u16, Self::Error>;
}

#[doc(hidden)]
pub mod noop {
    use super::AdacInterface;
    use crate::adac::registers::Pointer;

    pub struct NoopInterface;

    impl AdacInterface for NoopInterface {
        type Error = core::convert::Infallible;
        fn write_register(&mut self, _pointer: Pointer, _value: u16) -> Result<(), Self::Error> {
            Ok(())
        }
        fn read_register(&mut self, _pointer: Pointer) -> Result<u16, Self::Error> {
            Ok(0)
        }
    }
}

pub mod i2c {
    //! The I2C interface (SCL, SDA) of the AD5593R.

    use hal::blocking::i2c::{Write, WriteRead};
    use log::trace;

    use super::AdacInterface;
    use crate::adac::registers::Pointer;

    /// Bus address with the A0 pin tied low.
    pub const DEFAULT_ADDRESS: u8 = 0x10;

    /// Errors from either half of the I2C bus API.
    #[derive(Debug)]
    pub enum I2cInterfaceError<WE, RE> {
        /// An error occurred during an I2C write.
        WriteError(WE),
        /// An error occurred during an I2C write-then-read.
        ReadError(RE),
    }

    impl<WE, RE> I2cInterfaceError<WE, RE> {
        fn from_write(e: WE) -> Self {
            Self::WriteError(e)
        }
        fn from_read(e: RE) -> Self {
            Self::ReadError(e)
        }
    }

    /// A configured `AdacInterface` on an I2C bus.
    pub struct I2cInterface<I2C> {
        i2c: I2C,
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: Write + WriteRead,
    {
        /// Talk to the device at `address` (`0x10` or `0x11`, depending on A0).
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Talk to the device at [`DEFAULT_ADDRESS`].
        pub fn with_default_address(i2c: I2C) -> Self {
            Self::new(i2c, DEFAULT_ADDRESS)
        }

        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> AdacInterface for I2cInterface<I2C>
    where
        I2C: Write + WriteRead,
    {
        type Error = I2cInterfaceError<<I2C as Write>::Error, <I2C as WriteRead>::Error>;

        fn write_register(&mut self, pointer: Pointer, value: u16) -> Result<(), Self::Error> {
            let pointer = u8::from(pointer);
            trace!("ad5593r {:#04x}: write {:#02x} {:#06x}", self.address, pointer, value);
            let [msb, lsb] = value.to_be_bytes();
            self.i2c
                .write(self.address, &[pointer, msb, lsb])
                .map_err(Self::Error::from_write)
        }

        fn read_register(&mut self, pointer: Pointer) -> Result<u16, Self::Error> {
            let pointer = u8::from(pointer);
            let mut buf = [0u8; 2];
            self.i2c
                .write_read(self.address, &[pointer], &mut buf)
                .map_err(Self::Error::from_read)?;
            let value = u16::from_be_bytes(buf);
            trace!("ad5593r {:#04x}: read {:#02x} -> {:#06x}", self.address, pointer, value);
            Ok(value)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_spy {
    //! A simulated AD5593R for use in unit tests.

    use super::AdacInterface;
    use crate::adac::registers::{Pointer, SOFT_RESET_KEY};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TestBusError;

    #[derive(Default)]
    struct State {
        registers: [u16; 16],
        dac: [u16; 8],
        adc: [VecDeque<u16>; 8],
        inputs: u8,
        writes: Vec<(u8, u16)>,
        reads: Vec<u8>,
        nack_reset: bool,
    }

    pub struct TestSpyInterface {
        state: Arc<Mutex<State>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(State::default())),
            }
        }

        pub fn split(&self) -> Self {
            Self {
                state: self.state.clone(),
            }
        }

        pub fn register(&self, reg: u8) -> u16 {
            self.state.lock().unwrap().registers[reg as usize]
        }

        pub fn set_register(&self, reg: u8, value: u16) {
            self.state.lock().unwrap().registers[reg as usize] = value;
        }

        pub fn dac(&self, pin: u8) -> u16 {
            self.state.lock().unwrap().dac[pin as usize]
        }

        /// Queue raw 12-bit conversion results for an ADC channel.
        pub fn push_adc(&self, pin: u8, codes: &[u16]) {
            self.state.lock().unwrap().adc[pin as usize].extend(codes.iter().copied());
        }

        pub fn set_inputs(&self, levels: u8) {
            self.state.lock().unwrap().inputs = levels;
        }

        /// Fail the soft-reset write the way the device does when it resets mid-transaction.
        pub fn nack_reset(&self) {
            self.state.lock().unwrap().nack_reset = true;
        }

        pub fn writes(&self) -> Vec<(u8, u16)> {
            self.state.lock().unwrap().writes.clone()
        }

        pub fn reads(&self) -> Vec<u8> {
            self.state.lock().unwrap().reads.clone()
        }
    }

    impl AdacInterface for TestSpyInterface {
        type Error = TestBusError;

        fn write_register(&mut self, pointer: Pointer, value: u16) -> Result<(), Self::Error> {
            let mut state = self.state.lock().unwrap();
            let pointer = u8::from(pointer);
            state.writes.push((pointer, value));
            let low = (pointer & 0x0F) as usize;
            match pointer >> 4 {
                0x0 if low == 0xF => {
                    assert_eq!(value, SOFT_RESET_KEY);
                    state.registers = [0; 16];
                    state.dac = [0; 8];
                    if state.nack_reset {
                        return Err(TestBusError);
                    }
                }
                0x0 => state.registers[low] = value,
                0x1 => state.dac[low] = value & 0x0FFF,
                other => panic!("write in readback mode {:#x}", other),
            }
            Ok(())
        }

        fn read_register(&mut self, pointer: Pointer) -> Result<u16, Self::Error> {
            let mut state = self.state.lock().unwrap();
            let pointer = u8::from(pointer);
            state.reads.push(pointer);
            match pointer >> 4 {
                0x4 => {
                    let seq = state.registers[0x2] & 0x00FF;
                    assert!(seq != 0, "ADC readback with empty sequence");
                    let channel = seq.trailing_zeros() as usize;
                    let code = state.adc[channel]
                        .pop_front()
                        .expect("no ADC sample queued");
                    Ok(((channel as u16) << 12) | code)
                }
                0x6 => Ok(state.inputs as u16),
                0x7 => Ok(state.registers[(pointer & 0x0F) as usize]),
                other => panic!("unsupported readback mode {:#x}", other),
            }
        }
    }
}
