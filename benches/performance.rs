// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for fretwise
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Scale spelling across the whole catalog
//! - Tuning string parsing and octave resolution
//! - Chord building and classification
//! - Fretboard position lookups

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fretwise::music::chord::{build_chord, classify_chord, inversions, CHORDS};
use fretwise::music::fretboard::Tonality;
use fretwise::music::note::Note;
use fretwise::music::pitch::Pitch;
use fretwise::music::scale::{build_scale, Key, ScaleType};
use fretwise::music::tuning::{parse_tuning, resolve, Tuning};

/// Spell every catalog scale in every key
fn bench_build_scale(c: &mut Criterion) {
    let formulas: Vec<_> = ScaleType::ALL.iter().map(|st| st.formula()).collect();

    c.bench_function("build_scale_catalog", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &keynote in Note::ALL.iter() {
                for formula in &formulas {
                    total += build_scale(black_box(keynote), formula).len();
                }
            }
            black_box(total)
        })
    });
}

/// Parse and resolve tunings of increasing length
fn bench_tuning_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning");

    for strings in [6usize, 12, 48].iter() {
        let text: String = "EADGBE".repeat(strings / 6);
        group.bench_with_input(BenchmarkId::new("parse_resolve", strings), &text, |b, text| {
            b.iter(|| black_box(Tuning::parse(black_box(text), 4)))
        });

        let anchored = format!("E2{}", &text[1..]);
        let tokens = parse_tuning(&anchored).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("resolve_forward", strings), &tokens, |b, tokens| {
            b.iter(|| black_box(resolve(black_box(tokens), 4)))
        });
    }

    group.finish();
}

/// Build every chord and inversion on one root, then classify it
fn bench_chords(c: &mut Criterion) {
    let root: Pitch = Pitch::MIDDLE_C;

    c.bench_function("build_and_classify", |b| {
        b.iter(|| {
            let mut matched = 0usize;
            for chord in CHORDS.iter() {
                for structure in inversions(chord.structure()) {
                    let built = build_chord(&structure, black_box(&root));
                    if built.classify().is_some() {
                        matched += 1;
                    }
                }
            }
            black_box(matched)
        })
    });

    let key = Key::new(Note::ALL[0], ScaleType::Major);
    let triads = key.diatonic_triads();
    c.bench_function("classify_diatonic_triads", |b| {
        b.iter(|| {
            triads
                .iter()
                .filter(|triad| classify_chord(black_box(triad)).is_some())
                .count()
        })
    });
}

/// Walk positions up the neck
fn bench_positions(c: &mut Criterion) {
    let tuning = Tuning::find_or_parse("Standard", 4);
    let Ok(tuning) = tuning else {
        return;
    };
    let tonality = Tonality::new(Key::new(Note::ALL[0], ScaleType::Major), tuning);

    c.bench_function("positions_12_frets", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for offset in 0..12 {
                total += tonality.position(black_box(offset)).iter().map(Vec::len).sum::<usize>();
            }
            black_box(total)
        })
    });
}

criterion_group!(
    benches,
    bench_build_scale,
    bench_tuning_resolution,
    bench_chords,
    bench_positions,
);

criterion_main!(benches);
