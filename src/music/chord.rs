// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord structures, inversions and classification.
//!
//! A chord structure is a list of interval deltas measured from a root.
//! Root chords measure every delta upwards; inversions measure some of
//! them downwards so the same pitch classes stack in a different order.

use std::fmt;

use super::interval::{Interval, IntervalDelta};
use super::note::Note;
use super::pitch::Pitch;
use super::scale::Key;
use crate::error::{Result, TheoryError};

/// Deltas from a chord root
pub type ChordStructure = Vec<IntervalDelta>;

/// A named root-position chord from the catalog
#[derive(Debug, PartialEq, Eq)]
pub struct Chord {
    name: &'static str,
    structure: &'static [IntervalDelta],
}

const fn up(interval: Interval) -> IntervalDelta {
    IntervalDelta::up(interval)
}

/// Known chords in classification priority order
pub static CHORDS: [Chord; 7] = [
    Chord {
        name: "Major",
        structure: &[up(Interval::MajorThird), up(Interval::PerfectFifth)],
    },
    Chord {
        name: "Minor",
        structure: &[up(Interval::MinorThird), up(Interval::PerfectFifth)],
    },
    Chord {
        name: "Dominant 7",
        structure: &[
            up(Interval::MajorThird),
            up(Interval::PerfectFifth),
            up(Interval::MinorSeventh),
        ],
    },
    Chord {
        name: "minMaj7",
        structure: &[
            up(Interval::MinorThird),
            up(Interval::PerfectFifth),
            up(Interval::MajorSeventh),
        ],
    },
    Chord {
        name: "Maj7",
        structure: &[
            up(Interval::MajorThird),
            up(Interval::PerfectFifth),
            up(Interval::MajorSeventh),
        ],
    },
    Chord {
        name: "min7",
        structure: &[
            up(Interval::MinorThird),
            up(Interval::PerfectFifth),
            up(Interval::MinorSeventh),
        ],
    },
    Chord {
        name: "Diminished",
        structure: &[up(Interval::MinorThird), up(Interval::DiminishedFifth)],
    },
];

impl Chord {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Root-position deltas
    pub fn structure(&self) -> &'static [IntervalDelta] {
        self.structure
    }

    /// Cumulative widths from the root, root included as 0
    pub fn widths(&self) -> Vec<i32> {
        std::iter::once(0)
            .chain(self.structure.iter().map(|delta| delta.width()))
            .collect()
    }

    /// Look up a catalog chord by name (case-insensitive)
    pub fn find(name: &str) -> Result<&'static Chord> {
        CHORDS
            .iter()
            .find(|chord| chord.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| TheoryError::UnknownChord(name.to_string()))
    }

    pub fn inversions(&self) -> Vec<ChordStructure> {
        inversions(self.structure)
    }

    /// Build this chord on `root`
    pub fn on(&self, root: &Pitch) -> TonalChord {
        build_chord(self.structure, root)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Every spelling of the pitch reached by applying `delta` to `root`
pub fn apply_delta(root: &Pitch, delta: IntervalDelta) -> Vec<Pitch> {
    root.offset(delta.width())
}

/// A chord realized on a root pitch: one enharmonic set per chord tone
#[derive(Debug, Clone, PartialEq)]
pub struct TonalChord {
    members: Vec<Vec<Pitch>>,
}

impl TonalChord {
    /// Enharmonic sets, root first, then one per delta
    pub fn members(&self) -> &[Vec<Pitch>] {
        &self.members
    }

    pub fn root(&self) -> Pitch {
        self.members[0][0]
    }

    /// First spelling of each member
    pub fn voicing(&self) -> Vec<Pitch> {
        self.members.iter().map(|set| set[0]).collect()
    }

    /// Every distinct spelling used by the chord, in member order
    pub fn notes(&self) -> Vec<Note> {
        let mut notes = Vec::new();
        for pitch in self.members.iter().flatten() {
            if !notes.contains(&pitch.note()) {
                notes.push(pitch.note());
            }
        }
        notes
    }

    /// Match the voicing's distances from the root against the catalog
    pub fn classify(&self) -> Option<&'static Chord> {
        let root = self.root();
        let widths: Vec<i32> = self
            .voicing()
            .iter()
            .map(|pitch| root.interval_to(pitch))
            .collect();
        match_widths(&widths)
    }
}

/// Expand a structure on a root pitch
pub fn build_chord(structure: &[IntervalDelta], root: &Pitch) -> TonalChord {
    let mut members = Vec::with_capacity(structure.len() + 1);
    members.push(root.enharmonics());
    for &delta in structure {
        members.push(apply_delta(root, delta));
    }
    TonalChord { members }
}

/// Structure of the `inversion`-th inversion of a root chord.
///
/// Inversion 0 is root position. Inversion k (k >= 1) puts the k-th chord
/// tone in the bass: every delta from position k - 1 on is measured
/// downwards. A chord with n deltas has n + 1 inversions; larger indexes
/// wrap around.
pub fn invert_structure(root_chord: &[IntervalDelta], inversion: usize) -> ChordStructure {
    let inversion = inversion % (root_chord.len() + 1);
    root_chord
        .iter()
        .enumerate()
        .map(|(i, &delta)| {
            if inversion > 0 && i + 1 >= inversion {
                delta.invert()
            } else {
                delta
            }
        })
        .collect()
}

/// All inversions of a root chord, root position first
pub fn inversions(root_chord: &[IntervalDelta]) -> Vec<ChordStructure> {
    (0..=root_chord.len())
        .map(|inversion| invert_structure(root_chord, inversion))
        .collect()
}

fn match_widths(widths: &[i32]) -> Option<&'static Chord> {
    CHORDS
        .iter()
        .find(|chord| chord.structure.len() + 1 == widths.len() && chord.widths() == widths)
}

/// Classify a stacked chord given as note names, lowest first.
///
/// Each member's ascending distance from the first note is compared with
/// the catalog's widths. The first match in catalog order wins.
pub fn classify_chord(stack: &[Note]) -> Option<&'static Chord> {
    let first = stack.first()?.pitch_class();
    let widths: Vec<i32> = stack
        .iter()
        .map(|note| first.distance_to(note.pitch_class()) as i32)
        .collect();
    match_widths(&widths)
}

/// Spellings a chord uses when built on `root`, for highlighting fretboards
pub fn chord_notes(structure: &[IntervalDelta], root: Note) -> Vec<Note> {
    build_chord(structure, &Pitch::new(root, 3)).notes()
}

impl Key {
    /// Triads stacked in thirds on every degree, wrapping around the scale
    pub fn diatonic_triads(&self) -> Vec<Vec<Note>> {
        let notes = self.notes();
        let n = notes.len();
        (0..n)
            .map(|degree| {
                [0, 2, 4]
                    .iter()
                    .map(|step| notes[(degree + step) % n])
                    .collect()
            })
            .collect()
    }

    /// Each diatonic triad's root with its classification, if any
    pub fn diatonic_chords(&self) -> Vec<(Note, Option<&'static Chord>)> {
        self.diatonic_triads()
            .iter()
            .map(|triad| (triad[0], classify_chord(triad)))
            .collect()
    }
}
