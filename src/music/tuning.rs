// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument tunings.
//!
//! A tuning string such as `"EADGBE"` or `"E2 A D G C F"` lists one note
//! per string, lowest string first. Notes written without an octave borrow
//! one from their nearest neighbour that has it, stepping by the ascending
//! pitch-class distance between the two.

use std::fmt;

use tracing::debug;

use super::note::{Letter, Note, PitchClass};
use super::pitch::{check_octave, parse_note_token, NoteToken, Pitch};
use crate::error::{Result, TheoryError};

/// Octave given to a bare last string when nothing else anchors it
pub const DEFAULT_HIGHEST_OCTAVE: i32 = 4;

/// Split a tuning string into note tokens.
///
/// Whitespace between tokens is ignored and tokens may also be written back
/// to back. Fails on the first substring that is not a note; an empty
/// string is not a tuning either.
pub fn parse_tuning(text: &str) -> Result<Vec<NoteToken>> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();
    loop {
        let position = text.len() - rest.len();
        let (token, remainder) =
            parse_note_token(rest).ok_or_else(|| TheoryError::InvalidTuningToken {
                input: text.to_string(),
                position,
            })?;
        tokens.push(token);
        rest = remainder.trim_start();
        if rest.is_empty() {
            return Ok(tokens);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Anchored { pitch: Pitch, explicit: bool },
    Unresolved(Note),
}

/// The nearest `note` at or above `from`
fn above(from: &Pitch, note: Note) -> Pitch {
    let distance = from.pitch_class().distance_to(note.pitch_class()) as i32;
    Pitch::from_absolute(note, from.absolute() + distance)
}

/// The nearest `note` at or below `to`
fn below(to: &Pitch, note: Note) -> Pitch {
    let distance = note.pitch_class().distance_to(to.pitch_class()) as i32;
    Pitch::from_absolute(note, to.absolute() - distance)
}

/// Give every token an absolute pitch.
///
/// Forward pass: a bare note right of an anchored one is placed at the
/// nearest matching pitch above it, chaining rightwards. A bare last note
/// still unanchored gets `highest_octave`. Backward pass: every remaining
/// bare note is placed at the nearest matching pitch below its right
/// neighbour. Explicit octaves are never changed.
pub fn resolve(tokens: &[NoteToken], highest_octave: i32) -> Vec<Pitch> {
    let mut slots: Vec<Slot> = tokens
        .iter()
        .map(|token| match token {
            NoteToken::Bare(note) => Slot::Unresolved(*note),
            NoteToken::Absolute(pitch) => Slot::Anchored {
                pitch: *pitch,
                explicit: true,
            },
        })
        .collect();

    for i in 1..slots.len() {
        match (slots[i - 1], slots[i]) {
            (Slot::Anchored { pitch: prev, .. }, Slot::Unresolved(note)) => {
                slots[i] = Slot::Anchored {
                    pitch: above(&prev, note),
                    explicit: false,
                };
            }
            (
                Slot::Anchored {
                    pitch: prev,
                    explicit: false,
                },
                Slot::Anchored { pitch, .. },
            ) => {
                let seeded = above(&prev, pitch.note());
                if seeded != pitch {
                    debug!(%prev, %pitch, %seeded, "explicit octave disagrees with seeded strings");
                }
            }
            _ => {}
        }
    }

    let mut resolved = Vec::with_capacity(slots.len());
    let mut next: Option<Pitch> = None;
    for slot in slots.iter().rev() {
        let pitch = match (*slot, next) {
            (Slot::Anchored { pitch, .. }, _) => pitch,
            (Slot::Unresolved(note), Some(next)) => below(&next, note),
            (Slot::Unresolved(note), None) => Pitch::new(note, highest_octave),
        };
        resolved.push(pitch);
        next = Some(pitch);
    }
    resolved.reverse();
    resolved
}

/// Ascending pitch-class steps (0-11) between adjacent bare notes
pub fn pitch_class_intervals(notes: &[Note]) -> Vec<u8> {
    notes
        .windows(2)
        .map(|pair| pair[0].pitch_class().distance_to(pair[1].pitch_class()))
        .collect()
}

/// A fully resolved tuning, lowest string first
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    name: String,
    pitches: Vec<Pitch>,
}

impl Tuning {
    pub fn new(name: impl Into<String>, pitches: Vec<Pitch>) -> Self {
        Self {
            name: name.into(),
            pitches,
        }
    }

    /// Parse and resolve a tuning string; the string doubles as the name.
    ///
    /// `highest_octave` must lie in `0..=MAX_OCTAVE`.
    pub fn parse(text: &str, highest_octave: i32) -> Result<Self> {
        check_octave(highest_octave)?;
        let tokens = parse_tuning(text)?;
        Ok(Self::new(text.trim(), resolve(&tokens, highest_octave)))
    }

    /// Look up a named tuning, or parse the text as a tuning string
    pub fn find_or_parse(name_or_notes: &str, highest_octave: i32) -> Result<Self> {
        match NamedTuning::find(name_or_notes) {
            Some(named) => Ok(named.resolve(check_octave(highest_octave)?)),
            None => Self::parse(name_or_notes, highest_octave),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn notes(&self) -> Vec<Note> {
        self.pitches.iter().map(|p| p.note()).collect()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Signed semitone steps from each string to the next
    pub fn intervals(&self) -> Vec<i32> {
        self.pitches
            .windows(2)
            .map(|pair| pair[0].interval_to(&pair[1]))
            .collect()
    }

    /// The same string-to-string steps walked from another first pitch.
    ///
    /// Strings keep their spelling; only the first string takes `first`'s.
    pub fn starting_at(&self, first: Pitch) -> Self {
        let mut pitches = Vec::with_capacity(self.pitches.len());
        let mut absolute = first.absolute();
        pitches.push(first);
        for (step, original) in self.intervals().iter().zip(self.pitches.iter().skip(1)) {
            absolute += step;
            let class = PitchClass::from_semitones(absolute);
            let note = if original.pitch_class() == class {
                original.note()
            } else {
                class.spellings()[0]
            };
            let pitch = Pitch::from_absolute(note, absolute);
            pitches.push(pitch);
        }
        Self::new(self.name.clone(), pitches)
    }
}

impl fmt::Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strings: Vec<String> = self.pitches.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", strings.join(" "))
    }
}

/// A catalog tuning, written as bare notes
#[derive(Debug, PartialEq, Eq)]
pub struct NamedTuning {
    name: &'static str,
    notes: &'static [Note],
}

use Letter::{A, B, C, D, E, F, G};

/// Built-in tunings, lowest string first
pub static TUNINGS: [NamedTuning; 4] = [
    NamedTuning {
        name: "Standard Tuning",
        notes: &[
            Note::natural(E),
            Note::natural(A),
            Note::natural(D),
            Note::natural(G),
            Note::natural(B),
            Note::natural(E),
        ],
    },
    NamedTuning {
        name: "All Fourths Tuning",
        notes: &[
            Note::natural(E),
            Note::natural(A),
            Note::natural(D),
            Note::natural(G),
            Note::natural(C),
            Note::natural(F),
        ],
    },
    NamedTuning {
        name: "Drop D Tuning",
        notes: &[
            Note::natural(D),
            Note::natural(A),
            Note::natural(D),
            Note::natural(G),
            Note::natural(B),
            Note::natural(E),
        ],
    },
    NamedTuning {
        name: "Drop D All Fourths Tuning",
        notes: &[
            Note::natural(D),
            Note::natural(A),
            Note::natural(D),
            Note::natural(G),
            Note::natural(C),
            Note::natural(F),
        ],
    },
];

fn normalize_name(name: &str) -> String {
    let key = name.trim().to_lowercase().replace([' ', '-', '_'], "");
    key.strip_suffix("tuning").map(str::to_string).unwrap_or(key)
}

impl NamedTuning {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn notes(&self) -> &'static [Note] {
        self.notes
    }

    /// Find a catalog tuning by name; "Drop D", "drop-d" and "Drop D Tuning" all match
    pub fn find(name: &str) -> Option<&'static NamedTuning> {
        let key = normalize_name(name);
        TUNINGS.iter().find(|t| normalize_name(t.name) == key)
    }

    pub fn resolve(&self, highest_octave: i32) -> Tuning {
        let tokens: Vec<NoteToken> = self.notes.iter().map(|&n| NoteToken::Bare(n)).collect();
        Tuning::new(self.name, resolve(&tokens, highest_octave))
    }
}
