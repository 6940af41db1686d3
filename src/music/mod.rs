// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tonal arithmetic.
//!
//! Spelled notes and intervals at the bottom, absolute pitches on top of
//! them, then scales, chords and tunings built from pitches. Everything
//! here is a pure value computation.

pub mod chord;
pub mod fretboard;
pub mod interval;
pub mod note;
pub mod pitch;
pub mod scale;
pub mod tuning;

pub use chord::{build_chord, classify_chord, invert_structure, Chord, ChordStructure, TonalChord};
pub use fretboard::{rotate_into_position, Position, StringFret, Tonality};
pub use interval::{CompoundInterval, Direction, Interval, IntervalDelta};
pub use note::{Accidental, Letter, Note, PitchClass};
pub use pitch::{NoteToken, Pitch};
pub use scale::{build_scale, Key, Mode, ScaleFormula, ScaleRegistry, ScaleType};
pub use tuning::{NamedTuning, Tuning};
