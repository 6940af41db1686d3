// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fretboard lookups for a key played on a tuned instrument.

use super::note::Note;
use super::pitch::Pitch;
use super::scale::Key;
use super::tuning::Tuning;

/// Scale pitches per string, lowest string first
pub type Position = Vec<Vec<Pitch>>;

/// A fretted location; string 0 is the lowest string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringFret {
    pub string: usize,
    pub fret: u8,
}

impl StringFret {
    pub fn new(string: usize, fret: u8) -> Self {
        Self { string, fret }
    }

    /// Every spelling of the pitch sounding here, or `None` past the last string
    pub fn in_tuning(&self, tuning: &Tuning) -> Option<Vec<Pitch>> {
        tuning
            .pitches()
            .get(self.string)
            .map(|open| open.offset(self.fret as i32))
    }
}

impl Tuning {
    /// Note names for frets `0..=frets` on every string
    pub fn fret_notes(&self, frets: u8) -> Vec<Vec<Vec<Note>>> {
        self.pitches()
            .iter()
            .map(|open| {
                (0..=frets as i32)
                    .map(|fret| open.offset(fret).iter().map(|p| p.note()).collect())
                    .collect()
            })
            .collect()
    }
}

/// A key together with the tuning it is played in
#[derive(Debug, Clone, PartialEq)]
pub struct Tonality {
    key: Key,
    tuning: Tuning,
}

impl Tonality {
    pub fn new(key: Key, tuning: Tuning) -> Self {
        Self { key, tuning }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Spellings of the key
    pub fn notes(&self) -> &[Note] {
        self.key.notes()
    }

    /// Whether a fretted pitch is spelled as one of the key's notes
    pub fn contains(&self, pitch: &Pitch) -> bool {
        self.key.spells(pitch.note())
    }

    /// Octave band counted from the keynote, for colouring repeated shapes
    pub fn octave_band(&self, pitch: &Pitch) -> i32 {
        pitch.octave_offset(self.key.keynote())
    }

    /// The scale pitches reachable in one hand position.
    ///
    /// Each string covers one fret below `offset` up to, but excluding,
    /// the step to the next string, so a position never repeats a pitch
    /// the next string starts on. The last string borrows the first
    /// step. Single-string tunings span an octave.
    pub fn position(&self, offset: i32) -> Position {
        let steps = self.tuning.intervals();
        self.tuning
            .pitches()
            .iter()
            .enumerate()
            .map(|(string, open)| {
                let step = if steps.is_empty() {
                    12
                } else {
                    steps[string % steps.len()]
                };
                (-1..step)
                    .flat_map(|fret| open.offset(offset + fret))
                    .filter(|pitch| self.contains(pitch))
                    .collect()
            })
            .collect()
    }
}

/// Frets a position spans, counting the fret below it
pub fn position_length(position: &Position) -> usize {
    position.iter().map(Vec::len).max().unwrap_or(0) + 1
}

/// Rotate a note sequence right by `position` places, wrapping around
pub fn rotate_into_position<T: Clone>(notes: &[T], position: usize) -> Vec<T> {
    let mut rotated = notes.to_vec();
    if !rotated.is_empty() {
        let len = rotated.len();
        rotated.rotate_right(position % len);
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::ScaleType;

    fn pitch(s: &str) -> Pitch {
        s.parse().unwrap()
    }

    fn e_major_standard() -> Tonality {
        Tonality::new(
            Key::new("E".parse().unwrap(), ScaleType::Major),
            Tuning::parse("EADGBE", 4).unwrap(),
        )
    }

    #[test]
    fn test_string_fret_lookup() {
        let tuning = Tuning::parse("EADGBE", 4).unwrap();
        assert_eq!(
            StringFret::new(0, 0).in_tuning(&tuning),
            Some(vec![pitch("E2"), pitch("Fb2")])
        );
        assert_eq!(
            StringFret::new(1, 3).in_tuning(&tuning),
            Some(vec![pitch("C3"), pitch("B#2")])
        );
        assert_eq!(StringFret::new(5, 12).in_tuning(&tuning).unwrap()[0], pitch("E5"));
        assert_eq!(
            StringFret::new(3, 1).in_tuning(&tuning),
            Some(vec![pitch("G#3"), pitch("Ab3")])
        );
        assert_eq!(StringFret::new(6, 0).in_tuning(&tuning), None);
    }

    #[test]
    fn test_fret_notes() {
        let tuning = Tuning::parse("EADGBE", 4).unwrap();
        let table = tuning.fret_notes(12);
        assert_eq!(table.len(), 6);
        assert!(table.iter().all(|string| string.len() == 13));
        assert_eq!(table[0][0], vec!["E".parse::<Note>().unwrap(), "Fb".parse().unwrap()]);
        assert_eq!(table[0][12], table[0][0]);
        assert_eq!(table[2][2], vec!["E".parse::<Note>().unwrap(), "Fb".parse().unwrap()]);
    }

    #[test]
    fn test_position_zero() {
        let tonality = e_major_standard();
        let position = tonality.position(0);
        assert_eq!(position.len(), 6);
        assert_eq!(
            position[0],
            vec![pitch("D#2"), pitch("E2"), pitch("F#2"), pitch("G#2")]
        );
        assert_eq!(
            position[1],
            vec![pitch("G#2"), pitch("A2"), pitch("B2"), pitch("C#3")]
        );
        // G to B is a major third, so the G string stops a fret earlier
        assert_eq!(position[3], vec![pitch("F#3"), pitch("G#3"), pitch("A3")]);
        assert_eq!(position[5], vec![pitch("D#4"), pitch("E4"), pitch("F#4"), pitch("G#4")]);
        assert!(position.iter().flatten().all(|p| tonality.contains(p)));
        assert_eq!(position_length(&position), 5);
    }

    #[test]
    fn test_position_offset() {
        let tonality = e_major_standard();
        let shifted = tonality.position(12);
        let open = tonality.position(0);
        for (high, low) in shifted.iter().zip(open.iter()) {
            let raised: Vec<i32> = low.iter().map(|p| p.absolute() + 12).collect();
            let actual: Vec<i32> = high.iter().map(|p| p.absolute()).collect();
            assert_eq!(actual, raised);
        }
    }

    #[test]
    fn test_contains_uses_spelling() {
        let tonality = e_major_standard();
        assert!(tonality.contains(&pitch("G#3")));
        assert!(!tonality.contains(&pitch("Ab3")));
        assert!(!tonality.contains(&pitch("G3")));
        assert_eq!(tonality.notes().len(), 7);
    }

    #[test]
    fn test_octave_band() {
        let tonality = e_major_standard();
        assert_eq!(tonality.octave_band(&pitch("E2")), 2);
        assert_eq!(tonality.octave_band(&pitch("D#3")), 2);
        assert_eq!(tonality.octave_band(&pitch("E3")), 3);
    }

    #[test]
    fn test_rotate_into_position() {
        let notes = ['a', 'b', 'c'];
        assert_eq!(rotate_into_position(&notes, 0), vec!['a', 'b', 'c']);
        assert_eq!(rotate_into_position(&notes, 1), vec!['c', 'a', 'b']);
        assert_eq!(rotate_into_position(&notes, 4), vec!['c', 'a', 'b']);
        assert!(rotate_into_position::<char>(&[], 2).is_empty());
    }
}
