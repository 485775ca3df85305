//! Bit encoding of the bargraph LEDs onto the three daisy-chained shift registers.
//!
//! Each of the ten LEDs is a bi-color (red/green) part. Its green die hangs off one shift
//! register output and its red die off another; lighting both dies shows yellow. The three
//! registers are named after their position in the chain: `high` is shifted out first and ends up
//! in the last register, `low` is shifted out last and stays in the first.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};
use core::str::FromStr;

/// Number of LED positions on the bargraph.
pub const LED_COUNT: u8 = 10;

/// The contents of the three shift registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Segments {
    pub high: u8,
    pub mid: u8,
    pub low: u8,
}

impl Segments {
    /// Every LED dark.
    pub const OFF: Segments = Segments::new(0, 0, 0);

    pub const fn new(high: u8, mid: u8, low: u8) -> Self {
        Self { high, mid, low }
    }

    /// The register values in the order they are shifted into the chain.
    pub fn bytes(&self) -> [u8; 3] {
        [self.high, self.mid, self.low]
    }

    /// Total number of outputs driven high.
    pub fn count_ones(&self) -> u32 {
        self.high.count_ones() + self.mid.count_ones() + self.low.count_ones()
    }

    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

impl BitOr for Segments {
    type Output = Segments;

    fn bitor(self, rhs: Segments) -> Segments {
        Segments::new(self.high | rhs.high, self.mid | rhs.mid, self.low | rhs.low)
    }
}

impl BitAnd for Segments {
    type Output = Segments;

    fn bitand(self, rhs: Segments) -> Segments {
        Segments::new(self.high & rhs.high, self.mid & rhs.mid, self.low & rhs.low)
    }
}

impl BitOrAssign for Segments {
    fn bitor_assign(&mut self, rhs: Segments) {
        *self = *self | rhs;
    }
}

/// The colors a bargraph LED can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Green,
    Yellow,
    Red,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Green, Color::Yellow, Color::Red];

    fn table(self) -> &'static [Segments; LED_COUNT as usize] {
        match self {
            Color::Green => &GREEN,
            Color::Yellow => &YELLOW,
            Color::Red => &RED,
        }
    }
}

/// Returned when a color name is not one of `green`, `yellow` or `red`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownColor;

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("color must be 'green', 'red', or 'yellow'")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    /// Parse a color by name, ignoring ASCII case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or(UnknownColor)
    }
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
        }
    }
}

// Green dies: outputs 0-7 of the first register, then 0-1 of the second.
const GREEN: [Segments; LED_COUNT as usize] = [
    Segments::new(0, 0, 0x01),
    Segments::new(0, 0, 0x02),
    Segments::new(0, 0, 0x04),
    Segments::new(0, 0, 0x08),
    Segments::new(0, 0, 0x10),
    Segments::new(0, 0, 0x20),
    Segments::new(0, 0, 0x40),
    Segments::new(0, 0, 0x80),
    Segments::new(0, 0x01, 0),
    Segments::new(0, 0x02, 0),
];

// Red dies: outputs 2-7 of the second register, then 0-3 of the third.
const RED: [Segments; LED_COUNT as usize] = [
    Segments::new(0, 0x04, 0),
    Segments::new(0, 0x08, 0),
    Segments::new(0, 0x10, 0),
    Segments::new(0, 0x20, 0),
    Segments::new(0, 0x40, 0),
    Segments::new(0, 0x80, 0),
    Segments::new(0x01, 0, 0),
    Segments::new(0x02, 0, 0),
    Segments::new(0x04, 0, 0),
    Segments::new(0x08, 0, 0),
];

// Both dies of each LED.
const YELLOW: [Segments; LED_COUNT as usize] = [
    Segments::new(0, 0x04, 0x01),
    Segments::new(0, 0x08, 0x02),
    Segments::new(0, 0x10, 0x04),
    Segments::new(0, 0x20, 0x08),
    Segments::new(0, 0x40, 0x10),
    Segments::new(0, 0x80, 0x20),
    Segments::new(0x01, 0, 0x40),
    Segments::new(0x02, 0, 0x80),
    Segments::new(0x04, 0x01, 0),
    Segments::new(0x08, 0x02, 0),
];

/// Whether `index` names an LED position (1-based).
pub fn in_range(index: u8) -> bool {
    (1..=LED_COUNT).contains(&index)
}

/// The register pattern lighting the single LED at `index` in `color`. Positions outside
/// `1..=LED_COUNT` encode as [`Segments::OFF`].
pub fn segment(index: u8, color: Color) -> Segments {
    if in_range(index) {
        color.table()[index as usize - 1]
    } else {
        Segments::OFF
    }
}

/// How the bargraph positions are split into a green, a yellow and a red band for
/// [`level_pattern`]. Positions are assigned to the bands in that order starting at LED 1; anything
/// past the green and yellow bands is red.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorBands {
    pub green: u8,
    pub yellow: u8,
    pub red: u8,
}

impl ColorBands {
    pub const fn new(green: u8, yellow: u8, red: u8) -> Self {
        Self { green, yellow, red }
    }

    /// The color band that LED `position` falls into.
    pub fn color_at(&self, position: u8) -> Color {
        let green_end = self.green as u16;
        let yellow_end = green_end + self.yellow as u16;
        match position as u16 {
            p if p <= green_end => Color::Green,
            p if p <= yellow_end => Color::Yellow,
            _ => Color::Red,
        }
    }
}

impl Default for ColorBands {
    fn default() -> Self {
        Self::new(4, 3, 3)
    }
}

impl From<[u8; 3]> for ColorBands {
    fn from(counts: [u8; 3]) -> Self {
        Self::new(counts[0], counts[1], counts[2])
    }
}

/// The pattern for a level meter reading of `level`: LEDs `1..=level` lit in their band color.
/// A level outside `1..=LED_COUNT` is all dark.
pub fn level_pattern(level: u8, bands: ColorBands) -> Segments {
    if !in_range(level) {
        return Segments::OFF;
    }
    (1..=level).fold(Segments::OFF, |acc, pos| acc | segment(pos, bands.color_at(pos)))
}
