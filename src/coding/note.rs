//! Note names to frequencies.
//!
//! A note is written as a letter (`A`-`G`), an optional accidental (`#` or `b`)
//! and a non-negative octave, like `C4`, `A#3` or `Bb5`.
//! Frequencies use twelve tone equal temperament with A4 (pitch 69) at 440Hz.

use std::{fmt, str::FromStr};

use crate::error::Error;

pub const A4_PITCH: i64 = 69;
pub const A4_FREQUENCY: f64 = 440.0;
const NOTES_PER_OCTAVE: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    /// Raises the note by one semitone
    Sharp,
    /// Lowers the note by one semitone
    Flat,
}

/// A parsed note token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub letter: Letter,
    pub accidental: Option<Accidental>,
    pub octave: u32,
}

impl Letter {
    fn from_char(chr: char) -> Option<Self> {
        Some(match chr {
            'C' => Self::C,
            'D' => Self::D,
            'E' => Self::E,
            'F' => Self::F,
            'G' => Self::G,
            'A' => Self::A,
            'B' => Self::B,
            _ => return None,
        })
    }

    /// Semitones above the C of the same octave.
    pub fn offset(self) -> i64 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }
}

impl Accidental {
    fn from_char(chr: char) -> Option<Self> {
        match chr {
            '#' => Some(Self::Sharp),
            'b' => Some(Self::Flat),
            _ => None,
        }
    }

    pub fn shift(self) -> i64 {
        match self {
            Self::Sharp => 1,
            Self::Flat => -1,
        }
    }
}

impl Note {
    /// The semitone index of this note, where C4 is 60 and A4 is 69.
    pub fn pitch(&self) -> i64 {
        (self.octave as i64 + 1) * NOTES_PER_OCTAVE
            + self.letter.offset()
            + self.accidental.map_or(0, Accidental::shift)
    }

    pub fn frequency(&self) -> f64 {
        frequency_of(self.pitch())
    }
}

/// Converts a semitone index into a frequency in Hz.
pub fn frequency_of(pitch: i64) -> f64 {
    A4_FREQUENCY * 2_f64.powf((pitch - A4_PITCH) as f64 / NOTES_PER_OCTAVE as f64)
}

/// Parses a note token and returns its frequency in Hz.
pub fn resolve(token: &str) -> Result<f64, Error> {
    Ok(token.parse::<Note>()?.frequency())
}

impl FromStr for Note {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNote {
            token: token.to_owned(),
        };

        let mut chars = token.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let (accidental, digits) = match rest.chars().next().and_then(Accidental::from_char) {
            Some(accidental) => (Some(accidental), &rest[1..]),
            None => (None, rest),
        };

        if digits.is_empty() || !digits.bytes().all(|x| x.is_ascii_digit()) {
            return Err(invalid());
        }

        let octave = digits.parse::<u32>().map_err(|_| invalid())?;
        let note = Self {
            letter,
            accidental,
            octave,
        };

        // Absurd octaves overflow to an infinite frequency
        if !note.frequency().is_finite() {
            return Err(invalid());
        }

        Ok(note)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.letter)?;
        match self.accidental {
            Some(Accidental::Sharp) => f.write_str("#")?,
            Some(Accidental::Flat) => f.write_str("b")?,
            None => {}
        }
        write!(f, "{}", self.octave)
    }
}
