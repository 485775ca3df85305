//! Drivers for a handful of MikroE click boards.
//!
//! - [`bargraph`]: a 10-segment green/red LED bargraph behind a chain of SN74HC595 shift
//!   registers, with single-LED, range, cumulative and level-meter animations.
//! - [`adac`]: the AD5593R, an I2C part whose eight pins can each be a DAC output, an ADC input
//!   or a GPIO.
//! - [`isoadc`]: the AMC131M03 three-channel isolated ADC on SPI.
//! - [`buzzer`]: the PAM8904 piezo driver with a two-pin volume control.
//!
//! The drivers are intended to work on embedded platforms using any implementation of the
//! `embedded-hal` trait library. Each one talks to its hardware through a small interface trait
//! (e.g. [`bargraph::interface::ShiftRegisterInterface`]) with a provided implementation over the
//! `embedded-hal` bus and GPIO traits, so you can swap in your own transport.
//!
//! # Construction
//!
//! - Use your platform's `embedded-hal` implementation to obtain the buses and pins the board is
//!   connected to, plus a delay provider.
//! - Construct the board's interface (for the bargraph, [`bargraph::interface::spi::SpiInterface`]),
//!   which takes ownership of them.
//! - Construct the driver, which takes ownership of the interface.
//!
//! ```ignore
//! let spi = /* something implementing embedded_hal::blocking::spi::Write */
//! let (cs, mr, pwr) = /* three embedded_hal::digital::v2::OutputPins */
//!
//! let iface = click_drivers::bargraph::interface::spi::SpiInterface::new(spi, cs, mr, pwr);
//! let mut bargraph = click_drivers::BarGraph::new(iface, delay);
//! ```
//!
//! # Bargraph
//!
//! *See [`BarGraph`].*
//!
//! ```
//! # use click_drivers::bargraph::interface::noop::NoopInterface;
//! # use click_drivers::noop::NoopDelay;
//! use click_drivers::{BarGraph, Color, ColorBands};
//! # fn main() -> Result<(), core::convert::Infallible> {
//! let mut bargraph = BarGraph::new(NoopInterface, NoopDelay);
//! bargraph.reset()?;
//! bargraph.power(true)?;
//! bargraph.led_color(3, Color::Yellow)?;
//! bargraph.led_range(1, 10, Color::Green, 50)?;
//! bargraph.level_graph(7, ColorBands::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # ADAC
//!
//! *See [`Adac`] and [`adac::Configurator`].*
//!
//! Pins are assigned their modes with a builder, then used in raw mode through the driver, or
//! converted into an I/O adapter handing out pins that implement the `embedded-hal` digital
//! traits:
//!
//! ```
//! # use click_drivers::adac::interface::noop::NoopInterface;
//! use click_drivers::adac::{Adac, PinMode, Reference};
//! use click_drivers::DefaultMutex;
//! use embedded_hal::digital::v2::OutputPin;
//! # fn main() -> Result<(), core::convert::Infallible> {
//! let mut adac = Adac::new(NoopInterface, Reference::Internal);
//! adac.configure().pins(0..=3, PinMode::Output).commit()?;
//! let io = adac.into_io::<DefaultMutex<_>>();
//! let mut led = io.pin(2);
//! led.set_high()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Mutual exclusion
//!
//! The I/O adapter requires a mutual exclusion primitive to arbitrate access to the hardware from
//! multiple pins, given as a type implementing [`IOMutex`]. With the `std` Cargo feature,
//! `mutex::DefaultMutex<T>` is `std::sync::Mutex<T>`; with `cortexm` (and without `std`) it is
//! `cortex_m::interrupt::Mutex<core::cell::RefCell<T>>`.
//!
//! # Logging
//!
//! Bus frames are logged at `trace` level and configuration changes at `debug` through the
//! [`log`](https://docs.rs/log) facade. Conditions the drivers tolerate, such as an unacknowledged
//! soft reset, are logged at `warn`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(test)]
extern crate proptest;

extern crate embedded_hal as hal;

pub mod adac;
pub mod bargraph;
pub mod buzzer;
pub mod isoadc;
pub mod mutex;
#[doc(hidden)]
pub mod noop;

pub use adac::Adac;
pub use bargraph::interface::ShiftRegisterInterface;
pub use bargraph::{BarGraph, Color, ColorBands, Segments};
pub use buzzer::{Buzz3, Volume};
pub use isoadc::Amc131m0x;
#[cfg(any(feature = "std", feature = "cortexm"))]
pub use mutex::DefaultMutex;
pub use mutex::IOMutex;
