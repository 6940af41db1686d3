// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interval algebra.
//!
//! Named simple intervals, signed deltas built from them (the vocabulary
//! of chord structures) and compound intervals spanning whole octaves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TheoryError};

/// Named simple intervals, smaller than an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Unison,
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    DiminishedFifth,
    AugmentedFourth,
    PerfectFifth,
    MinorSixth,
    AugmentedFifth,
    MajorSixth,
    DiminishedSeventh,
    MinorSeventh,
    MajorSeventh,
}

/// Intervals by width; 6, 8 and 9 semitones have two names.
const BY_WIDTH: [&[Interval]; 12] = [
    &[Interval::Unison],
    &[Interval::MinorSecond],
    &[Interval::MajorSecond],
    &[Interval::MinorThird],
    &[Interval::MajorThird],
    &[Interval::PerfectFourth],
    &[Interval::DiminishedFifth, Interval::AugmentedFourth],
    &[Interval::PerfectFifth],
    &[Interval::MinorSixth, Interval::AugmentedFifth],
    &[Interval::MajorSixth, Interval::DiminishedSeventh],
    &[Interval::MinorSeventh],
    &[Interval::MajorSeventh],
];

impl Interval {
    pub const ALL: [Interval; 15] = [
        Interval::Unison,
        Interval::MinorSecond,
        Interval::MajorSecond,
        Interval::MinorThird,
        Interval::MajorThird,
        Interval::PerfectFourth,
        Interval::DiminishedFifth,
        Interval::AugmentedFourth,
        Interval::PerfectFifth,
        Interval::MinorSixth,
        Interval::AugmentedFifth,
        Interval::MajorSixth,
        Interval::DiminishedSeventh,
        Interval::MinorSeventh,
        Interval::MajorSeventh,
    ];

    /// Width in semitones (0-11)
    pub const fn width(self) -> i32 {
        match self {
            Interval::Unison => 0,
            Interval::MinorSecond => 1,
            Interval::MajorSecond => 2,
            Interval::MinorThird => 3,
            Interval::MajorThird => 4,
            Interval::PerfectFourth => 5,
            Interval::DiminishedFifth | Interval::AugmentedFourth => 6,
            Interval::PerfectFifth => 7,
            Interval::MinorSixth | Interval::AugmentedFifth => 8,
            Interval::MajorSixth | Interval::DiminishedSeventh => 9,
            Interval::MinorSeventh => 10,
            Interval::MajorSeventh => 11,
        }
    }

    /// The one or two intervals with the given width
    pub fn from_width(width: i32) -> Result<&'static [Interval]> {
        usize::try_from(width)
            .ok()
            .and_then(|w| BY_WIDTH.get(w).copied())
            .ok_or(TheoryError::UnknownWidth(width))
    }

    /// The interval completing this one to an octave.
    ///
    /// A5 and d7 have no partner in the catalog (d4, A2) and map to the
    /// first name of the complementary width instead.
    pub const fn invert(self) -> Interval {
        match self {
            Interval::Unison => Interval::Unison,
            Interval::MinorSecond => Interval::MajorSeventh,
            Interval::MajorSecond => Interval::MinorSeventh,
            Interval::MinorThird => Interval::MajorSixth,
            Interval::MajorThird => Interval::MinorSixth,
            Interval::PerfectFourth => Interval::PerfectFifth,
            Interval::DiminishedFifth => Interval::AugmentedFourth,
            Interval::AugmentedFourth => Interval::DiminishedFifth,
            Interval::PerfectFifth => Interval::PerfectFourth,
            Interval::MinorSixth => Interval::MajorThird,
            Interval::AugmentedFifth => Interval::MajorThird,
            Interval::MajorSixth => Interval::MinorThird,
            Interval::DiminishedSeventh => Interval::MinorThird,
            Interval::MinorSeventh => Interval::MajorSecond,
            Interval::MajorSeventh => Interval::MinorSecond,
        }
    }

    /// Short name used in the delta notation (`M3`, `p5`, `d7`)
    pub fn name(self) -> &'static str {
        match self {
            Interval::Unison => "U",
            Interval::MinorSecond => "m2",
            Interval::MajorSecond => "M2",
            Interval::MinorThird => "m3",
            Interval::MajorThird => "M3",
            Interval::PerfectFourth => "p4",
            Interval::DiminishedFifth => "d5",
            Interval::AugmentedFourth => "A4",
            Interval::PerfectFifth => "p5",
            Interval::MinorSixth => "m6",
            Interval::AugmentedFifth => "A5",
            Interval::MajorSixth => "M6",
            Interval::DiminishedSeventh => "d7",
            Interval::MinorSeventh => "m7",
            Interval::MajorSeventh => "M7",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        Interval::ALL
            .iter()
            .copied()
            .find(|interval| interval.name() == s)
            .ok_or_else(|| TheoryError::UnknownInterval(s.to_string()))
    }
}

/// Direction a delta is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    pub const fn flip(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A signed simple interval measured from a chord root, written `+M3` or `-p5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntervalDelta {
    direction: Direction,
    interval: Interval,
}

impl IntervalDelta {
    pub const fn new(direction: Direction, interval: Interval) -> Self {
        Self {
            direction,
            interval,
        }
    }

    pub const fn up(interval: Interval) -> Self {
        Self::new(Direction::Up, interval)
    }

    pub const fn down(interval: Interval) -> Self {
        Self::new(Direction::Down, interval)
    }

    pub fn direction(self) -> Direction {
        self.direction
    }

    pub fn interval(self) -> Interval {
        self.interval
    }

    pub fn is_up(self) -> bool {
        self.direction == Direction::Up
    }

    /// Signed width in semitones
    pub const fn width(self) -> i32 {
        self.direction.sign() * self.interval.width()
    }

    /// Measure the same pitch class from the other side of the root.
    ///
    /// `+M3` becomes `-m6` and `-p5` becomes `+p4`. Unison is self-inverse.
    pub const fn invert(self) -> Self {
        match self.interval {
            Interval::Unison => self,
            interval => Self::new(self.direction.flip(), interval.invert()),
        }
    }
}

impl fmt::Display for IntervalDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Up => '+',
            Direction::Down => '-',
        };
        write!(f, "{}{}", sign, self.interval)
    }
}

impl FromStr for IntervalDelta {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let direction = match trimmed.chars().next() {
            Some('+') => Direction::Up,
            Some('-') => Direction::Down,
            _ => return Err(TheoryError::UnknownInterval(s.to_string())),
        };
        let interval = trimmed[1..]
            .parse()
            .map_err(|_| TheoryError::UnknownInterval(s.to_string()))?;
        Ok(Self::new(direction, interval))
    }
}

impl TryFrom<String> for IntervalDelta {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<IntervalDelta> for String {
    fn from(delta: IntervalDelta) -> Self {
        delta.to_string()
    }
}

/// A simple interval extended by whole octaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundInterval {
    pub octaves: u32,
    pub interval: Interval,
}

impl CompoundInterval {
    pub const fn new(octaves: u32, interval: Interval) -> Self {
        Self { octaves, interval }
    }

    pub const fn width(self) -> u32 {
        12 * self.octaves + self.interval.width() as u32
    }

    /// Split a width into whole octaves plus a simple remainder.
    ///
    /// Returns two candidates when the remainder is an aliased width.
    pub fn from_width(width: u32) -> Vec<CompoundInterval> {
        let octaves = width / 12;
        BY_WIDTH[(width % 12) as usize]
            .iter()
            .map(|&interval| CompoundInterval::new(octaves, interval))
            .collect()
    }
}

impl fmt::Display for CompoundInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.octaves == 0 {
            write!(f, "{}", self.interval)
        } else {
            write!(f, "{}+{}oct", self.interval, self.octaves)
        }
    }
}
