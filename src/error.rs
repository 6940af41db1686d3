// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the tonal arithmetic core.

use thiserror::Error;

/// Errors raised when user text or numbers fall outside the fixed catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("unknown note spelling '{0}'")]
    UnknownSpelling(String),
    #[error("pitch class index {0} is outside 0-11")]
    UnknownIndex(i64),
    #[error("unknown interval '{0}'")]
    UnknownInterval(String),
    #[error("no simple interval is {0} semitones wide")]
    UnknownWidth(i32),
    #[error("invalid pitch '{0}' (expected a spelling followed by an octave, e.g. C#4)")]
    InvalidPitch(String),
    #[error("octave {0} is outside 0-10")]
    OctaveOutOfRange(i32),
    #[error("'{input}' is an invalid tuning (no note at byte {position})")]
    InvalidTuningToken { input: String, position: usize },
    #[error("unknown scale '{0}'")]
    UnknownScale(String),
    #[error("scale formula {0:?} needs at least one degree and offsets below 12")]
    InvalidFormula(Vec<u8>),
    #[error("unknown chord '{0}'")]
    UnknownChord(String),
}

/// Result alias used across the music modules.
pub type Result<T> = std::result::Result<T, TheoryError>;
