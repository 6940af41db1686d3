// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Absolute pitches.
//!
//! A [`Pitch`] binds a spelled [`Note`] to an octave number. The octave
//! number follows the letter (scientific pitch notation), so `B#3` and
//! `C4` sound the same and `Cb4` sounds below `C4`. All arithmetic goes
//! through [`Pitch::absolute`], which makes octave carries exact at every
//! boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::note::{Accidental, Letter, Note, PitchClass};
use crate::error::{Result, TheoryError};

/// A spelled note at a specific octave, e.g. `C#4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    note: Note,
    octave: i32,
}

impl Pitch {
    /// Middle C
    pub const MIDDLE_C: Pitch = Pitch::new(Note::natural(Letter::C), 4);

    pub const fn new(note: Note, octave: i32) -> Self {
        Self { note, octave }
    }

    /// Spell an absolute value with the given note.
    ///
    /// The note must belong to the pitch class of `absolute`.
    pub fn from_absolute(note: Note, absolute: i32) -> Self {
        debug_assert_eq!(
            note.pitch_class(),
            PitchClass::from_semitones(absolute),
            "{} cannot spell absolute value {}",
            note,
            absolute
        );
        Self {
            note,
            octave: (absolute - note.in_octave_offset()).div_euclid(12),
        }
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.note.pitch_class()
    }

    /// Semitones above C0; equal for enharmonic spellings
    pub fn absolute(&self) -> i32 {
        12 * self.octave + self.note.in_octave_offset()
    }

    /// Every spelling of the pitch `semitones` away (one or two results).
    pub fn offset(&self, semitones: i32) -> Vec<Pitch> {
        let target = self.absolute() + semitones;
        PitchClass::from_semitones(target)
            .spellings()
            .iter()
            .map(|&note| Pitch::from_absolute(note, target))
            .collect()
    }

    pub fn subtract(&self, semitones: i32) -> Vec<Pitch> {
        self.offset(-semitones)
    }

    /// Signed semitone distance from this pitch to `other`
    pub fn interval_to(&self, other: &Pitch) -> i32 {
        other.absolute() - self.absolute()
    }

    /// All spellings of this pitch, this one first
    pub fn enharmonics(&self) -> Vec<Pitch> {
        let absolute = self.absolute();
        std::iter::once(*self)
            .chain(
                self.note
                    .enharmonics()
                    .iter()
                    .filter(|&&note| note != self.note)
                    .map(|&note| Pitch::from_absolute(note, absolute)),
            )
            .collect()
    }

    /// The same sounding pitch spelled with `note`, if they are enharmonic
    pub fn respell(&self, note: Note) -> Option<Pitch> {
        note.is_enharmonic_with(self.note)
            .then(|| Pitch::from_absolute(note, self.absolute()))
    }

    /// Octave band of this pitch when `reference` starts each octave.
    ///
    /// Used to colour octave bands on a fretboard. Measured from the
    /// reference's offset within the octave, so `Cb` and `B#` land in the
    /// band they sound in rather than the one their octave number names.
    pub fn octave_offset(&self, reference: Note) -> i32 {
        (self.absolute() - reference.in_octave_offset()).div_euclid(12)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_note_token(s.trim()) {
            Some((NoteToken::Absolute(pitch), "")) => Ok(pitch),
            _ => Err(TheoryError::InvalidPitch(s.to_string())),
        }
    }
}

impl TryFrom<String> for Pitch {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}

/// A note as written in a tuning string: with or without an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteToken {
    /// Pitch class only, octave still to be inferred
    Bare(Note),
    /// Spelling with explicit octave digits
    Absolute(Pitch),
}

impl NoteToken {
    pub fn note(&self) -> Note {
        match self {
            NoteToken::Bare(note) => *note,
            NoteToken::Absolute(pitch) => pitch.note(),
        }
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self {
            NoteToken::Bare(_) => None,
            NoteToken::Absolute(pitch) => Some(*pitch),
        }
    }
}

impl fmt::Display for NoteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteToken::Bare(note) => write!(f, "{}", note),
            NoteToken::Absolute(pitch) => write!(f, "{}", pitch),
        }
    }
}

/// Highest octave accepted from text; octaves run from 0 to this
pub const MAX_OCTAVE: i32 = 10;

/// Reject octaves outside `0..=MAX_OCTAVE`
pub fn check_octave(octave: i32) -> Result<i32> {
    if (0..=MAX_OCTAVE).contains(&octave) {
        Ok(octave)
    } else {
        Err(TheoryError::OctaveOutOfRange(octave))
    }
}

/// Read one note from the front of `text`.
///
/// Two-character spellings win over one-character ones (`Bb` before `B`),
/// then a run of digits is taken as the octave. Returns the token and the
/// unread remainder, or `None` if `text` does not start with a spelling or
/// the octave is above [`MAX_OCTAVE`].
pub fn parse_note_token(text: &str) -> Option<(NoteToken, &str)> {
    let mut chars = text.chars();
    let letter = Letter::from_char(chars.next()?)?;
    let (accidental, mut rest) = match chars.next() {
        Some('#') => (Accidental::Sharp, &text[2..]),
        Some('b') => (Accidental::Flat, &text[2..]),
        _ => (Accidental::Natural, &text[1..]),
    };
    let note = Note::new(letter, accidental);

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return Some((NoteToken::Bare(note), rest));
    }
    let octave = rest[..digits]
        .parse::<i32>()
        .ok()
        .filter(|&octave| octave <= MAX_OCTAVE)?;
    rest = &rest[digits..];
    Some((NoteToken::Absolute(Pitch::new(note, octave)), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(s: &str) -> Pitch {
        s.parse().unwrap()
    }

    #[test]
    fn test_absolute_values() {
        assert_eq!(pitch("C4").absolute(), 48);
        assert_eq!(pitch("B#3").absolute(), 48);
        assert_eq!(pitch("Cb4").absolute(), 47);
        assert_eq!(pitch("B3").absolute(), 47);
        assert_eq!(pitch("A4").absolute(), 57);
    }

    #[test]
    fn test_offset_carries_up() {
        let results = pitch("B3").offset(1);
        assert_eq!(results, vec![pitch("C4"), pitch("B#3")]);
        assert!(results.iter().all(|p| p.absolute() == 48));
    }

    #[test]
    fn test_offset_carries_down() {
        let results = pitch("C4").subtract(1);
        assert_eq!(results, vec![pitch("B3"), pitch("Cb4")]);
        assert_eq!(results[0].octave(), 3);
    }

    #[test]
    fn test_offset_across_octaves() {
        assert_eq!(pitch("E2").offset(24)[0], pitch("E4"));
        assert_eq!(pitch("D4").offset(10)[0], pitch("C5"));
        assert_eq!(pitch("D4").offset(-3)[0], pitch("B3"));
        assert_eq!(pitch("G3").offset(1), vec![pitch("G#3"), pitch("Ab3")]);
        assert_eq!(pitch("A3").offset(0), vec![pitch("A3")]);
    }

    #[test]
    fn test_interval_to() {
        assert_eq!(pitch("E2").interval_to(&pitch("A2")), 5);
        assert_eq!(pitch("E4").interval_to(&pitch("E2")), -24);
        assert_eq!(pitch("B#3").interval_to(&pitch("C4")), 0);
    }

    #[test]
    fn test_enharmonics() {
        assert_eq!(pitch("C4").enharmonics(), vec![pitch("C4"), pitch("B#3")]);
        assert_eq!(pitch("Db4").enharmonics(), vec![pitch("Db4"), pitch("C#4")]);
        assert_eq!(pitch("D4").enharmonics(), vec![pitch("D4")]);
        assert_eq!(pitch("C4").respell("B#".parse().unwrap()), Some(pitch("B#3")));
        assert_eq!(pitch("C4").respell("D".parse().unwrap()), None);
    }

    #[test]
    fn test_octave_offset() {
        let e: Note = "E".parse().unwrap();
        assert_eq!(pitch("E2").octave_offset(e), 2);
        assert_eq!(pitch("D#3").octave_offset(e), 2);
        assert_eq!(pitch("E3").octave_offset(e), 3);

        let c: Note = "C".parse().unwrap();
        assert_eq!(pitch("Cb4").octave_offset(c), 3);
        assert_eq!(pitch("B#3").octave_offset(c), 4);
    }

    #[test]
    fn test_parse_note_token() {
        let (token, rest) = parse_note_token("Bb3EADG").unwrap();
        assert_eq!(token, NoteToken::Absolute(pitch("Bb3")));
        assert_eq!(rest, "EADG");

        let (token, rest) = parse_note_token("EADG").unwrap();
        assert_eq!(token, NoteToken::Bare("E".parse().unwrap()));
        assert_eq!(rest, "ADG");

        let (token, rest) = parse_note_token("F#10 B").unwrap();
        assert_eq!(token.pitch(), Some(pitch("F#10")));
        assert_eq!(rest, " B");

        assert!(parse_note_token("x").is_none());
        assert!(parse_note_token("").is_none());
    }

    #[test]
    fn test_pitch_from_str() {
        assert_eq!(Pitch::MIDDLE_C, pitch("C4"));
        assert_eq!(pitch("C#4").to_string(), "C#4");
        assert!(matches!("C".parse::<Pitch>(), Err(TheoryError::InvalidPitch(_))));
        assert!("C4x".parse::<Pitch>().is_err());
        assert!("H4".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_octave_bounds() {
        assert_eq!(pitch("C0").absolute(), 0);
        assert_eq!(pitch("B10").octave(), MAX_OCTAVE);
        assert!(parse_note_token("C11").is_none());
        assert!(matches!("C999999999".parse::<Pitch>(), Err(TheoryError::InvalidPitch(_))));
        assert!("E99999999999999999999".parse::<Pitch>().is_err());

        assert_eq!(check_octave(4), Ok(4));
        assert_eq!(check_octave(-1), Err(TheoryError::OctaveOutOfRange(-1)));
        assert!(check_octave(i32::MAX).is_err());
    }
}
