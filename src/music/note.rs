// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and their spellings.
//!
//! A [`PitchClass`] is one of the twelve chromatic indexes (C = 0). A
//! [`Note`] is a display spelling of a pitch class: a letter plus an
//! optional sharp or flat. Every pitch class has one or two spellings and
//! every spelling belongs to exactly one pitch class.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TheoryError};

/// Letter names (chromas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters from C upwards
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitones above C of the natural note with this letter
    pub const fn natural_offset(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// The following letter, B wrapping to C
    pub const fn next(self) -> Self {
        match self {
            Letter::C => Letter::D,
            Letter::D => Letter::E,
            Letter::E => Letter::F,
            Letter::F => Letter::G,
            Letter::G => Letter::A,
            Letter::A => Letter::B,
            Letter::B => Letter::C,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Accidentals supported by the spelling catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Semitone shift applied to the natural letter
    pub const fn shift(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Accidental::Sharp),
            'b' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// A spelled pitch class such as `C`, `F#` or `Bb`.
///
/// Serialized as its text form so persisted selections stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    letter: Letter,
    accidental: Accidental,
}

impl Note {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub const fn sharp(letter: Letter) -> Self {
        Self::new(letter, Accidental::Sharp)
    }

    pub const fn flat(letter: Letter) -> Self {
        Self::new(letter, Accidental::Flat)
    }

    /// Every valid spelling: naturals, then sharps, then flats
    pub const ALL: [Note; 21] = [
        Note::natural(Letter::C),
        Note::natural(Letter::D),
        Note::natural(Letter::E),
        Note::natural(Letter::F),
        Note::natural(Letter::G),
        Note::natural(Letter::A),
        Note::natural(Letter::B),
        Note::sharp(Letter::C),
        Note::sharp(Letter::D),
        Note::sharp(Letter::E),
        Note::sharp(Letter::F),
        Note::sharp(Letter::G),
        Note::sharp(Letter::A),
        Note::sharp(Letter::B),
        Note::flat(Letter::C),
        Note::flat(Letter::D),
        Note::flat(Letter::E),
        Note::flat(Letter::F),
        Note::flat(Letter::G),
        Note::flat(Letter::A),
        Note::flat(Letter::B),
    ];

    /// The letter (chroma) of this spelling, ignoring the accidental
    pub fn letter(self) -> Letter {
        self.letter
    }

    pub fn accidental(self) -> Accidental {
        self.accidental
    }

    pub fn is_natural(self) -> bool {
        self.accidental == Accidental::Natural
    }

    /// Semitones above the C of the same octave number.
    ///
    /// Ranges from -1 (`Cb`) to 12 (`B#`): the octave number belongs to
    /// the letter, so these two spellings sit across the C boundary.
    pub const fn in_octave_offset(self) -> i32 {
        self.letter.natural_offset() + self.accidental.shift()
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::from_semitones(self.in_octave_offset())
    }

    /// Chromatic index (0-11) of this spelling
    pub fn index(self) -> u8 {
        self.pitch_class().index()
    }

    /// All spellings of the same pitch class, this one included
    pub fn enharmonics(self) -> &'static [Note] {
        self.pitch_class().spellings()
    }

    /// Whether two spellings name the same pitch class
    pub fn is_enharmonic_with(self, other: Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

impl FromStr for Note {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| TheoryError::UnknownSpelling(s.to_string()))?;
        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some(c) => Accidental::from_char(c)
                .ok_or_else(|| TheoryError::UnknownSpelling(s.to_string()))?,
        };
        if chars.next().is_some() {
            return Err(TheoryError::UnknownSpelling(s.to_string()));
        }
        Ok(Note::new(letter, accidental))
    }
}

impl TryFrom<String> for Note {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

use Letter::{A, B, C, D, E, F, G};

/// Spellings per chromatic index, simpler spelling first.
const SPELLINGS: [&[Note]; 12] = [
    &[Note::natural(C), Note::sharp(B)],
    &[Note::sharp(C), Note::flat(D)],
    &[Note::natural(D)],
    &[Note::sharp(D), Note::flat(E)],
    &[Note::natural(E), Note::flat(F)],
    &[Note::natural(F), Note::sharp(E)],
    &[Note::sharp(F), Note::flat(G)],
    &[Note::natural(G)],
    &[Note::sharp(G), Note::flat(A)],
    &[Note::natural(A)],
    &[Note::sharp(A), Note::flat(B)],
    &[Note::natural(B), Note::flat(C)],
];

/// One of the twelve pitch classes, C = 0 ascending chromatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    /// Validate a chromatic index
    pub fn new(index: i64) -> Result<Self> {
        if (0..12).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(TheoryError::UnknownIndex(index))
        }
    }

    /// Pitch class reached by any semitone count above C, wrapping
    pub fn from_semitones(semitones: i32) -> Self {
        Self(semitones.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// One or two spellings, simpler first (naturals, then sharps on black keys)
    pub fn spellings(self) -> &'static [Note] {
        SPELLINGS[self.0 as usize]
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitones(self.0 as i32 + semitones)
    }

    /// Ascending distance (0-11) to another pitch class
    pub fn distance_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = TheoryError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index as i64)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}
