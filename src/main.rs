// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use tracing_subscriber::EnvFilter;

use fretwise::config::{validate_config, ConfigEvent, ConfigWatcher, FretwiseConfig};
use fretwise::music::chord::{build_chord, classify_chord, invert_structure, Chord, CHORDS};
use fretwise::music::fretboard::{position_length, Tonality};
use fretwise::music::note::Note;
use fretwise::music::pitch::Pitch;
use fretwise::music::scale::Key;

fn print_usage() {
    println!("fretwise - Scales, chords and tunings for stringed instruments");
    println!();
    println!("Usage: fretwise [--config FILE] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --scale <KEY> [SCALE]           Spell a scale (default Major)");
    println!("  --triads <KEY> [SCALE]          Diatonic triads and their chord names");
    println!("  --chord <ROOT> <NAME> [INV]     Build a chord on ROOT (e.g. C4) in inversion INV");
    println!("  --classify <NOTE>...            Name a stacked chord, lowest note first");
    println!("  --tuning <TUNING>               Resolve a tuning name or string (\"E2 A D\")");
    println!("  --position [OFFSET]             Scale pitches per string for the configured key");
    println!("  --frets                         In-key frets per string for the configured tuning");
    println!("  --list                          List scales, chords and tunings");
    println!("  --validate <FILE>               Check a config file");
    println!("  --watch <FILE>                  Reload a config file as it changes");
    println!("  --help                          Show this help message");
    println!();
    println!("Set RUST_LOG=debug to see spelling and tuning decisions.");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull `--config FILE` out of the argument list
fn take_config(args: &mut Vec<String>) -> Result<FretwiseConfig> {
    match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .cloned()
                .ok_or_else(|| anyhow!("--config requires a file"))?;
            args.drain(i..=i + 1);
            FretwiseConfig::load(&path)
        }
        None => Ok(FretwiseConfig::default()),
    }
}

fn argument<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires {}", args[1], what))
}

fn key_from_args(config: &FretwiseConfig, args: &[String]) -> Result<Key> {
    let keynote: Note = argument(args, 2, "a key")?.parse()?;
    let scale = args.get(3).map(String::as_str).unwrap_or("Major");
    config
        .scale_registry()
        .get_key(keynote, scale)
        .with_context(|| {
            let names = config.scale_registry().available_scales();
            format!("Available scales: {}", names.join(", "))
        })
}

fn print_scale(key: &Key) {
    println!("{}: {}", key.name(), join(key.notes()));
}

fn print_triads(key: &Key) {
    println!("{}", key.name());
    for (degree, triad) in key.diatonic_triads().iter().enumerate() {
        let name = classify_chord(triad).map_or("-", Chord::name);
        println!("  {}. {:<12} {}", degree + 1, join(triad), name);
    }
}

fn print_chord(args: &[String]) -> Result<()> {
    let root_text = argument(args, 2, "a root")?;
    let root: Pitch = match root_text.parse::<Pitch>() {
        Ok(pitch) => pitch,
        Err(_) => Pitch::new(root_text.parse()?, 4),
    };
    let chord = Chord::find(argument(args, 3, "a chord name")?)?;
    let inversion: usize = match args.get(4) {
        Some(text) => text
            .parse()
            .map_err(|_| anyhow!("Invalid inversion: {}", text))?,
        None => 0,
    };

    let structure = invert_structure(chord.structure(), inversion);
    let built = build_chord(&structure, &root);
    println!("{} {} (inversion {})", root, chord, inversion);
    println!("  structure: {}", join(&structure));
    println!("  voicing:   {}", join(&built.voicing()));
    println!("  notes:     {}", join(&built.notes()));
    Ok(())
}

fn print_classification(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        bail!("--classify requires at least one note");
    }
    let stack = args[2..]
        .iter()
        .map(|text| text.parse::<Note>())
        .collect::<fretwise::Result<Vec<_>>>()?;
    match classify_chord(&stack) {
        Some(chord) => println!("{}: {} {}", join(&stack), stack[0], chord),
        None => println!("{}: no match", join(&stack)),
    }
    Ok(())
}

fn print_tuning(config: &FretwiseConfig, text: &str) -> Result<()> {
    let tuning = config.find_tuning(text)?;
    println!("{}", tuning.name());
    println!("  strings:   {}", tuning);
    println!("  intervals: {}", join(&tuning.intervals()));
    Ok(())
}

fn print_tonality(tonality: &Tonality) {
    println!("{} in {} ({})", tonality.key().name(), tonality.tuning().name(), tonality.tuning());
}

fn print_position(tonality: &Tonality, offset: i32) {
    print_tonality(tonality);
    let position = tonality.position(offset);
    println!("Position at fret {} spans {} frets", offset, position_length(&position));
    for (string, pitches) in position.iter().enumerate().rev() {
        println!("  {}: {}", string + 1, join(pitches));
    }
}

fn print_frets(config: &FretwiseConfig) {
    let tonality = config.tonality();
    print_tonality(&tonality);
    let table = tonality.tuning().fret_notes(config.frets);
    for (string, frets) in table.iter().enumerate().rev() {
        let in_key: Vec<String> = frets
            .iter()
            .enumerate()
            .filter_map(|(fret, names)| {
                names
                    .iter()
                    .find(|&&note| tonality.key().spells(note))
                    .map(|note| format!("{}:{}", fret, note))
            })
            .collect();
        println!("  {}: {}", string + 1, in_key.join(" "));
    }
}

fn print_catalogs(config: &FretwiseConfig) {
    println!("Scales:");
    for name in config.scale_registry().available_scales() {
        println!("  {}", name);
    }
    println!("Chords:");
    for chord in CHORDS.iter() {
        println!("  {:<12} {}", chord.name(), join(chord.structure()));
    }
    println!("Tunings:");
    for name in config.available_tunings() {
        println!("  {}", name);
    }
}

fn watch(path: &str) -> Result<()> {
    let config = validate_config(path)?;
    print_tonality(&config.tonality());

    let watcher = ConfigWatcher::new(path, None)?;
    println!("Watching {:?} (press Ctrl+C to stop)...", watcher.watched_path());

    while let Some(event) = watcher.recv() {
        match event {
            ConfigEvent::Reloaded(config) => print_tonality(&config.tonality()),
            ConfigEvent::Error(message) => eprintln!("{}", message),
            ConfigEvent::FileCreated(_) | ConfigEvent::FileDeleted(_) => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let mut args: Vec<String> = env::args().collect();
    let config = take_config(&mut args)?;

    if args.len() < 2 {
        println!("fretwise - Scales, chords and tunings for stringed instruments");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--scale" => print_scale(&key_from_args(&config, &args)?),
        "--triads" => print_triads(&key_from_args(&config, &args)?),
        "--chord" => print_chord(&args)?,
        "--classify" => print_classification(&args)?,
        "--tuning" => {
            let text = args[2..].join(" ");
            if text.trim().is_empty() {
                bail!("--tuning requires a tuning name or string");
            }
            print_tuning(&config, &text)?;
        }
        "--position" => {
            let offset: u8 = match args.get(2) {
                Some(text) => text
                    .parse()
                    .map_err(|_| anyhow!("Invalid fret offset: {}", text))?,
                None => 0,
            };
            print_position(&config.tonality(), i32::from(offset));
        }
        "--frets" => print_frets(&config),
        "--list" => print_catalogs(&config),
        "--validate" => {
            let path = argument(&args, 2, "a file")?;
            let config = validate_config(path)?;
            println!("{} is valid", path);
            print_tonality(&config.tonality());
        }
        "--watch" => watch(argument(&args, 2, "a file")?)?,
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
