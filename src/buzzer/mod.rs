//! Driver for the Diodes PAM8904 piezo sounder driver (MikroE Buzz 3 click).
//!
//! Two enable pins select one of four output levels; the tone itself is a square wave on DIN,
//! supplied by anything implementing [`ToneOutput`].
//!
//! ```
//! # use click_drivers::buzzer::{riffs, Buzz3, Volume};
//! # use click_drivers::buzzer::interface::noop::NoopTone;
//! # use click_drivers::noop::{NoopDelay, NoopPin};
//! # fn main() -> Result<(), click_drivers::buzzer::Error<core::convert::Infallible, core::convert::Infallible>> {
//! let mut buzz = Buzz3::new(NoopPin, NoopPin, NoopTone, NoopDelay)?;
//! buzz.beep(4000, 200, Volume::High)?;
//! buzz.play_riff(riffs::FOR_ELISE, Volume::Low)?;
//! # Ok(())
//! # }
//! ```

use core::fmt;
use core::str::FromStr;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;
use log::debug;

pub mod interface;
pub mod riffs;

pub use self::interface::ToneOutput;

/// Duty cycle for a 50% square wave.
pub const HALF_DUTY: u16 = 0x8000;
/// Frequency left on the output while it is silent.
const IDLE_FREQUENCY_HZ: u32 = 1000;

/// Output level, set by the EN1 and EN2 pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Volume {
    /// -18 dB.
    Mute,
    /// -12 dB.
    Low,
    /// -6 dB.
    Medium,
    /// 0 dB.
    High,
}

impl Volume {
    pub const ALL: [Volume; 4] = [Volume::Mute, Volume::Low, Volume::Medium, Volume::High];

    /// The (EN1, EN2) levels selecting this volume.
    pub fn enables(self) -> (bool, bool) {
        match self {
            Volume::Mute => (false, false),
            Volume::Low => (false, true),
            Volume::Medium => (true, false),
            Volume::High => (true, true),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Volume::Mute => "mute",
            Volume::Low => "low",
            Volume::Medium => "medium",
            Volume::High => "high",
        }
    }
}

/// Returned when parsing a volume name that is not one of the four levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownVolume;

impl fmt::Display for UnknownVolume {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("level must be one of: mute, low, medium, high")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownVolume {}

impl FromStr for Volume {
    type Err = UnknownVolume;

    /// Parse a volume by name, ignoring ASCII case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Volume::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or(UnknownVolume)
    }
}

/// One note of a riff. A frequency of zero is a rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u32,
    pub duration_ms: u32,
    /// Silence after the note.
    pub pause_ms: u32,
}

impl Note {
    pub const fn new(freq_hz: u32, duration_ms: u32, pause_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            pause_ms,
        }
    }
}

impl From<(u32, u32)> for Note {
    fn from((freq_hz, duration_ms): (u32, u32)) -> Self {
        Note::new(freq_hz, duration_ms, 0)
    }
}

impl From<(u32, u32, u32)> for Note {
    fn from((freq_hz, duration_ms, pause_ms): (u32, u32, u32)) -> Self {
        Note::new(freq_hz, duration_ms, pause_ms)
    }
}

/// The union of all errors that may occur while driving the buzzer.
#[derive(Debug, PartialEq)]
pub enum Error<PE, TE> {
    /// An enable GPIO threw an error.
    EnableError(PE),
    /// The tone output threw an error.
    ToneError(TE),
}

impl<PE, TE> Error<PE, TE> {
    fn from_enable(e: PE) -> Self {
        Self::EnableError(e)
    }
    fn from_tone(e: TE) -> Self {
        Self::ToneError(e)
    }
}

/// The Buzz 3 click.
pub struct Buzz3<EN1, EN2, T, D> {
    en1: EN1,
    en2: EN2,
    tone: T,
    delay: D,
    volume: Volume,
}

impl<EN1, EN2, T, D, PE> Buzz3<EN1, EN2, T, D>
where
    EN1: OutputPin<Error = PE>,
    EN2: OutputPin<Error = PE>,
    T: ToneOutput,
    D: DelayMs<u32>,
{
    /// Take the pins, silence the output and mute it.
    pub fn new(en1: EN1, en2: EN2, tone: T, delay: D) -> Result<Self, Error<PE, T::Error>> {
        let mut buzz = Self {
            en1,
            en2,
            tone,
            delay,
            volume: Volume::Mute,
        };
        buzz.tone.set_duty(0).map_err(Error::<PE, T::Error>::from_tone)?;
        buzz.set_volume(Volume::Mute)?;
        buzz.silence()?;
        Ok(buzz)
    }

    /// Give back the pins, tone output and delay.
    pub fn release(self) -> (EN1, EN2, T, D) {
        (self.en1, self.en2, self.tone, self.delay)
    }

    pub fn set_volume(&mut self, volume: Volume) -> Result<(), Error<PE, T::Error>> {
        debug!("buzz3: volume {}", volume.name());
        let (en1, en2) = volume.enables();
        set_pin(&mut self.en1, en1).map_err(Error::<PE, T::Error>::from_enable)?;
        set_pin(&mut self.en2, en2).map_err(Error::<PE, T::Error>::from_enable)?;
        self.volume = volume;
        Ok(())
    }

    /// The volume last set.
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Start a tone at `freq_hz` with the given duty cycle. A frequency of zero silences the
    /// output.
    pub fn set_tone(&mut self, freq_hz: u32, duty: u16) -> Result<(), Error<PE, T::Error>> {
        if freq_hz == 0 {
            self.tone.set_duty(0).map_err(Error::<PE, T::Error>::from_tone)?;
            self.tone
                .set_frequency(IDLE_FREQUENCY_HZ)
                .map_err(Error::<PE, T::Error>::from_tone)
        } else {
            self.tone.set_frequency(freq_hz).map_err(Error::<PE, T::Error>::from_tone)?;
            self.tone.set_duty(duty).map_err(Error::<PE, T::Error>::from_tone)
        }
    }

    pub fn silence(&mut self) -> Result<(), Error<PE, T::Error>> {
        self.set_tone(0, 0)
    }

    /// Sound `freq_hz` for `duration_ms` at `volume`, then go back to the previous volume.
    pub fn beep(
        &mut self,
        freq_hz: u32,
        duration_ms: u32,
        volume: Volume,
    ) -> Result<(), Error<PE, T::Error>> {
        let previous = self.volume;
        self.set_volume(volume)?;
        self.set_tone(freq_hz, HALF_DUTY)?;
        self.delay.delay_ms(duration_ms);
        self.silence()?;
        self.set_volume(previous)
    }

    /// Play `riff` note by note at `volume`, then go back to the previous volume.
    pub fn play_riff(&mut self, riff: &[Note], volume: Volume) -> Result<(), Error<PE, T::Error>> {
        debug!("buzz3: riff of {} notes", riff.len());
        let previous = self.volume;
        self.set_volume(volume)?;
        for note in riff {
            self.set_tone(note.freq_hz, HALF_DUTY)?;
            self.delay.delay_ms(note.duration_ms);
            self.silence()?;
            if note.pause_ms > 0 {
                self.delay.delay_ms(note.pause_ms);
            }
        }
        self.set_volume(previous)
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}
