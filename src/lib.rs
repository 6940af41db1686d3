// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! fretwise: music-theory arithmetic for stringed instruments.
//!
//! Spells scales in every key, builds and classifies chords with their
//! inversions, and resolves tuning strings like `"E2 A D G B E"` into
//! absolute pitches for fretboard lookups.

pub mod config;
pub mod error;
pub mod music;

pub use error::{Result, TheoryError};
