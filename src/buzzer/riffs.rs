//! A few short tunes for [`Buzz3::play_riff`](super::Buzz3::play_riff).

use super::Note;

pub const SMOKE_ON_THE_WATER: &[Note] = &[
    Note::new(277, 400, 120),
    Note::new(330, 400, 180),
    Note::new(370, 600, 200),
    Note::new(277, 400, 120),
    Note::new(330, 400, 180),
    Note::new(392, 250, 80),
    Note::new(370, 600, 200),
    Note::new(277, 400, 120),
    Note::new(330, 400, 180),
    Note::new(370, 600, 200),
    Note::new(330, 400, 150),
    Note::new(277, 800, 500),
];

pub const SWEET_CHILD: &[Note] = &[
    Note::new(392, 250, 60),
    Note::new(330, 250, 60),
    Note::new(349, 250, 60),
    Note::new(294, 250, 60),
    Note::new(330, 250, 60),
    Note::new(294, 250, 60),
    Note::new(349, 250, 60),
    Note::new(392, 400, 120),
];

/// Ends with a rest.
pub const FOR_ELISE: &[Note] = &[
    Note::new(659, 200, 50),
    Note::new(622, 200, 50),
    Note::new(659, 200, 50),
    Note::new(622, 200, 50),
    Note::new(659, 200, 50),
    Note::new(494, 200, 50),
    Note::new(587, 200, 50),
    Note::new(523, 200, 50),
    Note::new(440, 400, 120),
    Note::new(0, 200, 50),
];

pub const CHA_CHA_CHA: &[Note] = &[
    Note::new(523, 180, 60),
    Note::new(523, 90, 30),
    Note::new(523, 90, 30),
    Note::new(587, 180, 60),
    Note::new(659, 360, 120),
    Note::new(587, 180, 60),
    Note::new(523, 90, 30),
    Note::new(523, 90, 30),
    Note::new(659, 180, 60),
    Note::new(523, 360, 120),
];
