// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and key system.
//!
//! Provides the scale formula catalog, modal rotation, spelled scale
//! construction (one letter per degree where possible) and a registry for
//! custom formulas loaded from config.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::note::{Letter, Note, PitchClass};
use super::pitch::Pitch;
use crate::error::{Result, TheoryError};

/// Semitone offsets from the keynote, one per scale degree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ScaleFormula {
    offsets: Vec<u8>,
}

impl ScaleFormula {
    /// Build a formula; offsets must be below 12 and there must be at least one
    pub fn new(offsets: Vec<u8>) -> Result<Self> {
        if offsets.is_empty() || offsets.iter().any(|&o| o >= 12) {
            return Err(TheoryError::InvalidFormula(offsets));
        }
        Ok(Self { offsets })
    }

    fn from_static(offsets: &[u8]) -> Self {
        Self {
            offsets: offsets.to_vec(),
        }
    }

    /// Number of degrees
    pub fn degrees(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[u8] {
        &self.offsets
    }

    /// Rotate the formula to start on `starting_degree` (0-based) and
    /// measure every offset from the new first degree.
    pub fn mode(&self, starting_degree: usize) -> Self {
        let n = self.offsets.len();
        let start = self.offsets[starting_degree % n] as i32;
        let offsets = (0..n)
            .map(|i| (self.offsets[(i + starting_degree) % n] as i32 - start).rem_euclid(12) as u8)
            .collect();
        Self { offsets }
    }
}

impl TryFrom<Vec<u8>> for ScaleFormula {
    type Error = TheoryError;

    fn try_from(offsets: Vec<u8>) -> Result<Self> {
        Self::new(offsets)
    }
}

impl From<ScaleFormula> for Vec<u8> {
    fn from(formula: ScaleFormula) -> Self {
        formula.offsets
    }
}

const MAJOR: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
const HARMONIC_MINOR: [u8; 7] = [0, 2, 3, 5, 7, 8, 11];
/// Harmonic minor with a lowered 2nd and raised 3rd
const DOUBLE_HARMONIC: [u8; 7] = [0, 1, 4, 5, 7, 8, 11];
const CHROMATIC: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// The seven diatonic modes, as rotations of the major formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Degree of the major scale this mode starts on (0-based)
    pub fn starting_degree(self) -> usize {
        match self {
            Mode::Ionian => 0,
            Mode::Dorian => 1,
            Mode::Phrygian => 2,
            Mode::Lydian => 3,
            Mode::Mixolydian => 4,
            Mode::Aeolian => 5,
            Mode::Locrian => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }

    pub fn formula(self) -> ScaleFormula {
        ScaleFormula::from_static(&MAJOR).mode(self.starting_degree())
    }
}

/// Scale types in the built-in catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    Minor,
    HarmonicMinor,
    DoubleHarmonic,
    Chromatic,
    Mode(Mode),
}

impl ScaleType {
    /// Catalog in display order
    pub const ALL: [ScaleType; 12] = [
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::HarmonicMinor,
        ScaleType::DoubleHarmonic,
        ScaleType::Chromatic,
        ScaleType::Mode(Mode::Ionian),
        ScaleType::Mode(Mode::Dorian),
        ScaleType::Mode(Mode::Phrygian),
        ScaleType::Mode(Mode::Lydian),
        ScaleType::Mode(Mode::Mixolydian),
        ScaleType::Mode(Mode::Aeolian),
        ScaleType::Mode(Mode::Locrian),
    ];

    /// Get the formula for this scale type
    pub fn formula(self) -> ScaleFormula {
        match self {
            ScaleType::Major => ScaleFormula::from_static(&MAJOR),
            ScaleType::Minor => ScaleFormula::from_static(&MINOR),
            ScaleType::HarmonicMinor => ScaleFormula::from_static(&HARMONIC_MINOR),
            ScaleType::DoubleHarmonic => ScaleFormula::from_static(&DOUBLE_HARMONIC),
            ScaleType::Chromatic => ScaleFormula::from_static(&CHROMATIC),
            ScaleType::Mode(mode) => mode.formula(),
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Minor => "Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::DoubleHarmonic => "Double Harmonic",
            ScaleType::Chromatic => "Chromatic",
            ScaleType::Mode(mode) => mode.name(),
        }
    }

    /// Get the parallel minor/major scale type
    pub fn parallel(self) -> Option<Self> {
        match self {
            ScaleType::Major => Some(ScaleType::Minor),
            ScaleType::Minor => Some(ScaleType::Major),
            ScaleType::Mode(Mode::Ionian) => Some(ScaleType::Mode(Mode::Aeolian)),
            ScaleType::Mode(Mode::Aeolian) => Some(ScaleType::Mode(Mode::Ionian)),
            _ => None,
        }
    }
}

impl FromStr for ScaleType {
    type Err = TheoryError;

    /// Accepts display names and loose aliases ("Harmonic Minor", "harmonic_minor")
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        let scale_type = match key.as_str() {
            "major" => ScaleType::Major,
            "minor" | "naturalminor" => ScaleType::Minor,
            "harmonicminor" => ScaleType::HarmonicMinor,
            "doubleharmonic" | "doubleharmonicminor" => ScaleType::DoubleHarmonic,
            "chromatic" => ScaleType::Chromatic,
            other => Mode::ALL
                .iter()
                .find(|mode| mode.name().to_lowercase() == other)
                .map(|&mode| ScaleType::Mode(mode))
                .ok_or_else(|| TheoryError::UnknownScale(s.to_string()))?,
        };
        Ok(scale_type)
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pick the spelling for one scale degree.
///
/// Candidates whose letter is already used are dropped. Among the rest the
/// one whose letter follows `previous` wins, then spelling-table order.
/// When every candidate reuses a letter the natural spelling (or the first
/// one) is taken anyway.
fn choose_spelling(candidates: &[Note], used: &[Letter], previous: Letter) -> Note {
    let fresh = candidates
        .iter()
        .enumerate()
        .filter(|(_, note)| !used.contains(&note.letter()))
        .min_by_key(|(position, note)| (note.letter() != previous.next(), *position))
        .map(|(_, &note)| note);

    fresh.unwrap_or_else(|| {
        let fallback = candidates
            .iter()
            .copied()
            .find(|note| note.is_natural())
            .unwrap_or(candidates[0]);
        debug!(
            candidates = ?candidates,
            "every spelling reuses a letter, falling back to {}", fallback
        );
        fallback
    })
}

/// Spell the scale built on `keynote`.
///
/// Always returns `formula.degrees()` notes starting with the keynote.
/// Letters are not repeated unless the formula has more degrees than
/// spellings allow (chromatic), in which case a letter is reused rather
/// than failing.
pub fn build_scale(keynote: Note, formula: &ScaleFormula) -> Vec<Note> {
    let start = keynote.pitch_class();
    let mut notes = Vec::with_capacity(formula.degrees());
    let mut used = Vec::with_capacity(formula.degrees());
    notes.push(keynote);
    used.push(keynote.letter());

    let mut previous = keynote.letter();
    for &offset in &formula.offsets()[1..] {
        let candidates = start.transpose(offset as i32).spellings();
        let note = choose_spelling(candidates, &used, previous);
        notes.push(note);
        used.push(note.letter());
        previous = note.letter();
    }

    notes
}

/// A keynote with a scale formula and its spelled realization.
///
/// Immutable: changing the keynote or formula builds a new `Key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    keynote: Note,
    scale_name: String,
    formula: ScaleFormula,
    notes: Vec<Note>,
}

impl Key {
    /// Create a key from the built-in catalog
    pub fn new(keynote: Note, scale_type: ScaleType) -> Self {
        Self::custom(keynote, scale_type.name(), scale_type.formula())
    }

    /// Create a key from any formula
    pub fn custom(keynote: Note, scale_name: impl Into<String>, formula: ScaleFormula) -> Self {
        let notes = build_scale(keynote, &formula);
        Self {
            keynote,
            scale_name: scale_name.into(),
            formula,
            notes,
        }
    }

    /// Parse a key from strings (e.g., "D", "dorian")
    pub fn parse(keynote: &str, scale: &str) -> Result<Self> {
        Ok(Key::new(keynote.parse()?, scale.parse()?))
    }

    pub fn keynote(&self) -> Note {
        self.keynote
    }

    pub fn scale_name(&self) -> &str {
        &self.scale_name
    }

    /// Full name, e.g. "D Major"
    pub fn name(&self) -> String {
        format!("{} {}", self.keynote, self.scale_name)
    }

    pub fn formula(&self) -> &ScaleFormula {
        &self.formula
    }

    /// Spelled notes, keynote first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.notes.iter().map(|note| note.pitch_class()).collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Check whether a note's pitch class is in this key, whatever its spelling
    pub fn contains(&self, note: Note) -> bool {
        self.notes.iter().any(|n| n.is_enharmonic_with(note))
    }

    pub fn contains_pitch(&self, pitch: &Pitch) -> bool {
        self.contains(pitch.note())
    }

    /// Whether the exact spelling appears in the scale
    pub fn spells(&self, note: Note) -> bool {
        self.notes.contains(&note)
    }

    /// Get the scale degree (1-based) for a note, if it's in the key
    pub fn degree_of(&self, note: Note) -> Option<usize> {
        self.notes
            .iter()
            .position(|n| n.is_enharmonic_with(note))
            .map(|i| i + 1)
    }

    /// Get the note at a given scale degree (1-based)
    pub fn note_at_degree(&self, degree: usize) -> Option<Note> {
        if degree == 0 {
            return None;
        }
        self.notes.get(degree - 1).copied()
    }

    /// Same formula on another keynote
    pub fn with_keynote(&self, keynote: Note) -> Self {
        Self::custom(keynote, self.scale_name.clone(), self.formula.clone())
    }

    /// Get the parallel key (same keynote, major <-> minor)
    pub fn parallel(&self) -> Option<Key> {
        let scale_type: ScaleType = self.scale_name.parse().ok()?;
        scale_type.parallel().map(|st| Key::new(self.keynote, st))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keynote, self.scale_name)
    }
}

/// Custom scale definitions that can be loaded from config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomScaleDefinition {
    /// Name of the scale
    pub name: String,
    /// Offsets from the keynote (semitones)
    pub intervals: Vec<u8>,
}

impl CustomScaleDefinition {
    /// Create a key from this definition
    pub fn to_key(&self, keynote: Note) -> Result<Key> {
        let formula = ScaleFormula::new(self.intervals.clone())?;
        Ok(Key::custom(keynote, self.name.clone(), formula))
    }
}

/// Registry for custom scale definitions
#[derive(Debug, Clone, Default)]
pub struct ScaleRegistry {
    custom_scales: HashMap<String, CustomScaleDefinition>,
}

impl ScaleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom scale
    pub fn register(&mut self, def: CustomScaleDefinition) {
        self.custom_scales.insert(def.name.clone(), def);
    }

    /// Get a key by scale name (checks custom first, then built-in)
    pub fn get_key(&self, keynote: Note, name: &str) -> Result<Key> {
        if let Some(def) = self.custom_scales.get(name) {
            return def.to_key(keynote);
        }

        name.parse::<ScaleType>().map(|st| Key::new(keynote, st))
    }

    /// List all available scale names
    pub fn available_scales(&self) -> Vec<String> {
        let mut names: Vec<String> = ScaleType::ALL
            .iter()
            .map(|st| st.name().to_string())
            .collect();
        let mut custom: Vec<String> = self.custom_scales.keys().cloned().collect();
        custom.sort();
        names.extend(custom);
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(names: &[&str]) -> Vec<Note> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    fn note(name: &str) -> Note {
        name.parse().unwrap()
    }

    #[test]
    fn test_scale_type_formulas() {
        assert_eq!(ScaleType::Major.formula().offsets(), &[0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(ScaleType::Minor.formula().offsets(), &[0, 2, 3, 5, 7, 8, 10]);
        assert_eq!(ScaleType::DoubleHarmonic.formula().offsets(), &[0, 1, 4, 5, 7, 8, 11]);
        assert_eq!(ScaleType::Chromatic.formula().degrees(), 12);
    }

    #[test]
    fn test_modes_rotate_major() {
        assert_eq!(Mode::Ionian.formula(), ScaleType::Major.formula());
        assert_eq!(Mode::Dorian.formula().offsets(), &[0, 2, 3, 5, 7, 9, 10]);
        assert_eq!(Mode::Lydian.formula().offsets(), &[0, 2, 4, 6, 7, 9, 11]);
        assert_eq!(Mode::Aeolian.formula(), ScaleType::Minor.formula());
        assert_eq!(Mode::Locrian.formula().offsets(), &[0, 1, 3, 5, 6, 8, 10]);
    }

    #[test]
    fn test_scale_type_from_str() {
        assert_eq!("major".parse::<ScaleType>(), Ok(ScaleType::Major));
        assert_eq!("Harmonic Minor".parse::<ScaleType>(), Ok(ScaleType::HarmonicMinor));
        assert_eq!("harmonic_minor".parse::<ScaleType>(), Ok(ScaleType::HarmonicMinor));
        assert_eq!("Dorian".parse::<ScaleType>(), Ok(ScaleType::Mode(Mode::Dorian)));
        assert!(matches!("unknown".parse::<ScaleType>(), Err(TheoryError::UnknownScale(_))));
        for scale_type in ScaleType::ALL {
            assert_eq!(scale_type.name().parse::<ScaleType>(), Ok(scale_type));
        }
    }

    #[test]
    fn test_d_major_spelling() {
        let scale = build_scale(note("D"), &ScaleType::Major.formula());
        assert_eq!(scale, notes(&["D", "E", "F#", "G", "A", "B", "C#"]));
    }

    #[test]
    fn test_flat_and_sharp_keys() {
        let f_major = build_scale(note("F"), &ScaleType::Major.formula());
        assert_eq!(f_major, notes(&["F", "G", "A", "Bb", "C", "D", "E"]));

        let f_sharp = build_scale(note("F#"), &ScaleType::Major.formula());
        assert_eq!(f_sharp, notes(&["F#", "G#", "A#", "B", "C#", "D#", "E#"]));

        let g_flat = build_scale(note("Gb"), &ScaleType::Major.formula());
        assert_eq!(g_flat, notes(&["Gb", "Ab", "Bb", "Cb", "Db", "Eb", "F"]));

        let c_minor = build_scale(note("C"), &ScaleType::Minor.formula());
        assert_eq!(c_minor, notes(&["C", "D", "Eb", "F", "G", "Ab", "Bb"]));
    }

    #[test]
    fn test_harmonic_minor_spelling() {
        let a = build_scale(note("A"), &ScaleType::HarmonicMinor.formula());
        assert_eq!(a, notes(&["A", "B", "C", "D", "E", "F", "G#"]));
    }

    #[test]
    fn test_chromatic_reuses_letters() {
        let scale = build_scale(note("C"), &ScaleType::Chromatic.formula());
        assert_eq!(
            scale,
            notes(&["C", "Db", "D", "Eb", "Fb", "F", "Gb", "G", "Ab", "A", "Bb", "B"])
        );
    }

    #[test]
    fn test_choose_spelling_prefers_unused_letter() {
        let candidates = notes(&["C#", "Db"]);
        assert_eq!(choose_spelling(&candidates, &[Letter::C], Letter::B), note("Db"));
        assert_eq!(choose_spelling(&candidates, &[Letter::D], Letter::B), note("C#"));
        assert_eq!(choose_spelling(&candidates, &[], Letter::B), note("C#"));
        assert_eq!(
            choose_spelling(&notes(&["E", "Fb"]), &[Letter::E, Letter::F], Letter::D),
            note("E")
        );
    }

    #[test]
    fn test_choose_spelling_follows_previous_letter() {
        let candidates = notes(&["F", "E#"]);
        assert_eq!(choose_spelling(&candidates, &[], Letter::D), note("E#"));
        assert_eq!(choose_spelling(&candidates, &[], Letter::E), note("F"));
        assert_eq!(choose_spelling(&candidates, &[], Letter::A), note("F"));
        assert_eq!(choose_spelling(&notes(&["C#", "Db"]), &[], Letter::C), note("Db"));
    }

    #[test]
    fn test_sharp_keys_use_e_sharp_and_b_sharp() {
        let c_sharp = build_scale(note("C#"), &ScaleType::Major.formula());
        assert_eq!(c_sharp, notes(&["C#", "D#", "E#", "F#", "G#", "A#", "B#"]));

        let d_sharp_minor = build_scale(note("D#"), &ScaleType::Minor.formula());
        assert_eq!(d_sharp_minor, notes(&["D#", "E#", "F#", "G#", "A#", "B", "C#"]));

        let b_lydian = build_scale(note("B"), &ScaleType::Mode(Mode::Lydian).formula());
        assert_eq!(b_lydian, notes(&["B", "C#", "D#", "E#", "F#", "G#", "A#"]));
    }

    #[test]
    fn test_formula_validation() {
        assert!(ScaleFormula::new(vec![0, 3, 7]).is_ok());
        assert!(ScaleFormula::new(vec![]).is_err());
        assert!(matches!(
            ScaleFormula::new(vec![0, 12]),
            Err(TheoryError::InvalidFormula(_))
        ));
    }

    #[test]
    fn test_key_queries() {
        let key = Key::parse("D", "major").unwrap();
        assert_eq!(key.name(), "D Major");
        assert_eq!(key.len(), 7);
        assert!(key.contains(note("Gb")));
        assert!(!key.spells(note("Gb")));
        assert!(key.spells(note("F#")));
        assert!(!key.contains(note("F")));
        assert_eq!(key.degree_of(note("A")), Some(5));
        assert_eq!(key.note_at_degree(7), Some(note("C#")));
        assert_eq!(key.note_at_degree(0), None);
        assert_eq!(key.note_at_degree(8), None);
    }

    #[test]
    fn test_key_rebuild() {
        let key = Key::new(note("C"), ScaleType::Major);
        let moved = key.with_keynote(note("Eb"));
        assert_eq!(moved.notes(), notes(&["Eb", "F", "G", "Ab", "Bb", "C", "D"]).as_slice());
        assert_eq!(key.keynote(), note("C"));

        let parallel = key.parallel().unwrap();
        assert_eq!(parallel.scale_name(), "Minor");
        assert_eq!(parallel.keynote(), note("C"));
        assert_eq!(ScaleType::Mode(Mode::Aeolian).parallel(), Some(ScaleType::Mode(Mode::Ionian)));
        assert_eq!(Key::new(note("C"), ScaleType::HarmonicMinor).parallel(), None);
    }

    #[test]
    fn test_scale_registry() {
        let mut registry = ScaleRegistry::new();
        registry.register(CustomScaleDefinition {
            name: "Major Pentatonic".to_string(),
            intervals: vec![0, 2, 4, 7, 9],
        });

        let custom = registry.get_key(note("G"), "Major Pentatonic").unwrap();
        assert_eq!(custom.notes(), notes(&["G", "A", "B", "D", "E"]).as_slice());

        let major = registry.get_key(note("G"), "major").unwrap();
        assert_eq!(major.len(), 7);

        assert!(registry.get_key(note("G"), "nope").is_err());
        let names = registry.available_scales();
        assert_eq!(names[0], "Major");
        assert!(names.contains(&"Major Pentatonic".to_string()));
    }
}
