//! Shims between `embedded-hal` hardware and the AMC131M0x frame protocol.

use crate::isoadc::registers::Frame;

/// A transport that exchanges whole frames with the AMC131M0x and drives its reset and sync lines.
pub trait FrameInterface {
    /// The type of error that the transport may return.
    type Error;
    /// Clock `frame` out to the device inside one chip-select frame, replacing its contents with
    /// the bytes clocked in.
    fn transfer_frame(&mut self, frame: &mut Frame) -> Result<(), Self::Error>;
    /// Drive the (active low) SYNC/RESET line. `true` holds the device in reset.
    fn set_reset(&mut self, asserted: bool) -> Result<(), Self::Error>;
    /// Drive the (active low) sync line. `true` pulls it low.
    fn set_sync(&mut self, asserted: bool) -> Result<(), Self::Error>;
}

#[doc(hidden)]
pub mod noop {
    use super::FrameInterface;
    use crate::isoadc::registers::Frame;

    pub struct NoopInterface;

    impl FrameInterface for NoopInterface {
        type Error = core::convert::Infallible;
        fn transfer_frame(&mut self, frame: &mut Frame) -> Result<(), Self::Error> {
            // Report the DC/DC converter as enabled so that `init` succeeds.
            *frame = [0; 15];
            frame[1] = 1;
            Ok(())
        }
        fn set_reset(&mut self, _asserted: bool) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_sync(&mut self, _asserted: bool) -> Result<(), Self::Error> {
            Ok(())
        }
    }
}

pub mod spi {
    //! Talk to the AMC131M0x over a full-duplex SPI bus (mode 1) with GPIOs for chip select,
    //! reset and sync.

    use hal::blocking::spi::Transfer;
    use hal::digital::v2::OutputPin;

    use super::FrameInterface;
    use crate::isoadc::registers::Frame;

    /// The union of all errors that may occur on the SPI interface.
    #[derive(Debug)]
    pub enum SpiInterfaceError<PE, TE> {
        /// The chip select GPIO threw an error.
        CSError(PE),
        /// The reset GPIO threw an error.
        ResetError(PE),
        /// The sync GPIO threw an error.
        SyncError(PE),
        /// An error occurred during the SPI transfer.
        TransferError(TE),
    }

    impl<PE, TE> SpiInterfaceError<PE, TE> {
        fn from_cs(e: PE) -> Self {
            Self::CSError(e)
        }
        fn from_reset(e: PE) -> Self {
            Self::ResetError(e)
        }
        fn from_sync(e: PE) -> Self {
            Self::SyncError(e)
        }
        fn from_transfer(e: TE) -> Self {
            Self::TransferError(e)
        }
    }

    /// A configured `FrameInterface` for an AMC131M0x wired to an SPI bus.
    pub struct SpiInterface<SPI, CS, RST, SYNC> {
        spi: SPI,
        cs: CS,
        rst: RST,
        sync: SYNC,
    }

    impl<SPI, CS, RST, SYNC, PE> SpiInterface<SPI, CS, RST, SYNC>
    where
        SPI: Transfer<u8>,
        CS: OutputPin<Error = PE>,
        RST: OutputPin<Error = PE>,
        SYNC: OutputPin<Error = PE>,
    {
        /// Create a new SPI interface. `cs`, `rst` and `sync` should idle high.
        pub fn new(spi: SPI, cs: CS, rst: RST, sync: SYNC) -> Self {
            Self { spi, cs, rst, sync }
        }

        /// Give back the bus and pins.
        pub fn release(self) -> (SPI, CS, RST, SYNC) {
            (self.spi, self.cs, self.rst, self.sync)
        }
    }

    impl<SPI, CS, RST, SYNC, PE> FrameInterface for SpiInterface<SPI, CS, RST, SYNC>
    where
        SPI: Transfer<u8>,
        CS: OutputPin<Error = PE>,
        RST: OutputPin<Error = PE>,
        SYNC: OutputPin<Error = PE>,
    {
        type Error = SpiInterfaceError<PE, <SPI as Transfer<u8>>::Error>;

        fn transfer_frame(&mut self, frame: &mut Frame) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(Self::Error::from_cs)?;
            let result = self.spi.transfer(frame).map(|_| ());
            self.cs.set_high().map_err(Self::Error::from_cs)?;
            result.map_err(Self::Error::from_transfer)
        }

        fn set_reset(&mut self, asserted: bool) -> Result<(), Self::Error> {
            let result = if asserted {
                self.rst.set_low()
            } else {
                self.rst.set_high()
            };
            result.map_err(Self::Error::from_reset)
        }

        fn set_sync(&mut self, asserted: bool) -> Result<(), Self::Error> {
            let result = if asserted {
                self.sync.set_low()
            } else {
                self.sync.set_high()
            };
            result.map_err(Self::Error::from_sync)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_spy {
    //! A simulated AMC131M0x and a delay for use in unit tests. The device answers register reads
    //! one frame late and hands out queued conversion results, one set per frame.

    use super::FrameInterface;
    use crate::isoadc::registers::{Frame, FRAME_LEN, WORD_LEN};
    use hal::blocking::delay::{DelayMs, DelayUs};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum Event {
        Frame(Frame),
        Reset(bool),
        Sync(bool),
        DelayMs(u32),
        DelayUs(u32),
    }

    struct Device {
        registers: [u16; 64],
        pending: u16,
        samples: VecDeque<[i16; 3]>,
        dcdc_stuck: bool,
        events: Vec<Event>,
    }

    impl Device {
        fn exchange(&mut self, frame: &mut Frame) {
            self.events.push(Event::Frame(*frame));
            let opcode = frame[0] & 0xE0;
            let addr = ((frame[0] & 0x1F) << 1) | (frame[1] >> 7);
            let value = u16::from_be_bytes([frame[WORD_LEN], frame[WORD_LEN + 1]]);

            let mut reply = [0u8; FRAME_LEN];
            reply[..2].copy_from_slice(&self.pending.to_be_bytes());
            if let Some(samples) = self.samples.pop_front() {
                for (ch, s) in samples.iter().enumerate() {
                    let base = (ch + 1) * WORD_LEN;
                    reply[base..base + 2].copy_from_slice(&s.to_be_bytes());
                }
            }
            *frame = reply;

            self.pending = 0;
            match opcode {
                0xA0 => self.pending = self.registers[addr as usize],
                0x60 => {
                    if !(addr == 0x31 && self.dcdc_stuck) {
                        self.registers[addr as usize] = value;
                    }
                }
                _ => {}
            }
        }
    }

    pub struct TestSpyInterface {
        device: Arc<Mutex<Device>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            Self {
                device: Arc::new(Mutex::new(Device {
                    registers: [0; 64],
                    pending: 0,
                    samples: VecDeque::new(),
                    dcdc_stuck: false,
                    events: Vec::new(),
                })),
            }
        }

        pub fn split(&self) -> Self {
            Self {
                device: self.device.clone(),
            }
        }

        pub fn delay(&self) -> TestDelay {
            TestDelay {
                device: self.device.clone(),
            }
        }

        pub fn register(&self, addr: u8) -> u16 {
            self.device.lock().unwrap().registers[addr as usize]
        }

        pub fn set_register(&self, addr: u8, value: u16) {
            self.device.lock().unwrap().registers[addr as usize] = value;
        }

        /// Queue one set of channel results, returned by the next frame that has none queued
        /// before it.
        pub fn push_samples(&self, samples: [i16; 3]) {
            self.device.lock().unwrap().samples.push_back(samples);
        }

        /// Make writes to the DC/DC control register have no effect.
        pub fn dcdc_stuck(&self) {
            self.device.lock().unwrap().dcdc_stuck = true;
        }

        pub fn events(&self) -> Vec<Event> {
            self.device.lock().unwrap().events.clone()
        }

        /// Frames as sent by the driver.
        pub fn frames(&self) -> Vec<Frame> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Frame(f) => Some(f),
                    _ => None,
                })
                .collect()
        }
    }

    impl FrameInterface for TestSpyInterface {
        type Error = ();

        fn transfer_frame(&mut self, frame: &mut Frame) -> Result<(), Self::Error> {
            self.device.lock().unwrap().exchange(frame);
            Ok(())
        }
        fn set_reset(&mut self, asserted: bool) -> Result<(), Self::Error> {
            self.device.lock().unwrap().events.push(Event::Reset(asserted));
            Ok(())
        }
        fn set_sync(&mut self, asserted: bool) -> Result<(), Self::Error> {
            self.device.lock().unwrap().events.push(Event::Sync(asserted));
            Ok(())
        }
    }

    pub struct TestDelay {
        device: Arc<Mutex<Device>>,
    }

    impl DelayMs<u32> for TestDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.device.lock().unwrap().events.push(Event::DelayMs(ms));
        }
    }

    impl DelayUs<u32> for TestDelay {
        fn delay_us(&mut self, us: u32) {
            self.device.lock().unwrap().events.push(Event::DelayUs(us));
        }
    }
}
