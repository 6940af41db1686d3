// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for fretwise.
//!
//! A config file selects the key center, scale and tuning to work in and
//! may define extra scales and tunings by name. YAML and TOML are both
//! accepted; the file extension decides which parser is used.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::music::fretboard::Tonality;
use crate::music::note::{Letter, Note};
use crate::music::pitch::check_octave;
use crate::music::scale::{CustomScaleDefinition, Key, ScaleRegistry, ScaleType};
use crate::music::tuning::{NamedTuning, Tuning, DEFAULT_HIGHEST_OCTAVE, TUNINGS};

/// File formats a config can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.toml` is YAML
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FretwiseConfig {
    /// Keynote spelling (e.g., "E", "F#", "Bb")
    #[serde(default = "default_key_center")]
    pub key_center: String,
    /// Scale name (e.g., "Major", "dorian", or a custom scale)
    #[serde(default = "default_scale")]
    pub scale: String,
    /// Tuning name or tuning string (e.g., "Drop D", "E2 A D G B E")
    #[serde(default = "default_tuning")]
    pub tuning: String,
    /// Octave given to a bare last string (0-10)
    #[serde(default = "default_highest_octave")]
    pub highest_octave: i32,
    /// Number of frets shown in fret tables
    #[serde(default = "default_frets")]
    pub frets: u8,
    /// Extra scales by name
    #[serde(default)]
    pub scales: Vec<CustomScaleDefinition>,
    /// Extra tunings by name
    #[serde(default)]
    pub tunings: Vec<CustomTuning>,
}

fn default_key_center() -> String {
    "E".to_string()
}
fn default_scale() -> String {
    "Major".to_string()
}
fn default_tuning() -> String {
    "Standard".to_string()
}
fn default_highest_octave() -> i32 {
    DEFAULT_HIGHEST_OCTAVE
}
fn default_frets() -> u8 {
    12
}

impl Default for FretwiseConfig {
    fn default() -> Self {
        Self {
            key_center: default_key_center(),
            scale: default_scale(),
            tuning: default_tuning(),
            highest_octave: default_highest_octave(),
            frets: default_frets(),
            scales: Vec::new(),
            tunings: Vec::new(),
        }
    }
}

/// A named tuning string defined in config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomTuning {
    pub name: String,
    /// Tuning string, lowest string first (e.g., "D A D G A D")
    pub notes: String,
}

impl FretwiseConfig {
    /// Load a configuration file, YAML or TOML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let parsed = match ConfigFormat::from_path(&path) {
            ConfigFormat::Yaml => Self::from_yaml(&contents),
            ConfigFormat::Toml => Self::from_toml(&contents),
        };
        parsed.with_context(|| format!("Invalid config file: {:?}", path.as_ref()))
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save configuration, YAML or TOML by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = match ConfigFormat::from_path(&path) {
            ConfigFormat::Yaml => self.to_yaml()?,
            ConfigFormat::Toml => self.to_toml()?,
        };
        fs::write(path.as_ref(), text)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Built-in scales plus the ones defined here
    pub fn scale_registry(&self) -> ScaleRegistry {
        let mut registry = ScaleRegistry::new();
        for def in &self.scales {
            registry.register(def.clone());
        }
        registry
    }

    /// The configured key, falling back to E and Major on bad input
    pub fn key(&self) -> Key {
        let keynote = self.key_center.parse::<Note>().unwrap_or_else(|e| {
            warn!(key_center = %self.key_center, error = %e, "Invalid key center, using E");
            Note::natural(Letter::E)
        });
        self.scale_registry()
            .get_key(keynote, &self.scale)
            .unwrap_or_else(|e| {
                warn!(scale = %self.scale, error = %e, "Invalid scale, using Major");
                Key::new(keynote, ScaleType::Major)
            })
    }

    /// Resolve a tuning by custom name, catalog name or tuning string
    pub fn find_tuning(&self, name_or_notes: &str) -> crate::error::Result<Tuning> {
        self.tuning_at(name_or_notes, self.highest_octave)
    }

    fn tuning_at(&self, name_or_notes: &str, highest_octave: i32) -> crate::error::Result<Tuning> {
        let custom = self
            .tunings
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name_or_notes.trim()));
        match custom {
            Some(custom) => {
                let parsed = Tuning::parse(&custom.notes, highest_octave)?;
                Ok(Tuning::new(custom.name.clone(), parsed.pitches().to_vec()))
            }
            None => Tuning::find_or_parse(name_or_notes, highest_octave),
        }
    }

    /// The configured highest octave, or the default when out of range
    pub fn highest_octave(&self) -> i32 {
        check_octave(self.highest_octave).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid highest octave, using {}", DEFAULT_HIGHEST_OCTAVE);
            DEFAULT_HIGHEST_OCTAVE
        })
    }

    /// The configured tuning, falling back to Standard on bad input
    pub fn resolve_tuning(&self) -> Tuning {
        let highest_octave = self.highest_octave();
        self.tuning_at(&self.tuning, highest_octave).unwrap_or_else(|e| {
            warn!(tuning = %self.tuning, error = %e, "Invalid tuning, using Standard");
            TUNINGS[0].resolve(highest_octave)
        })
    }

    /// Key and tuning bundled for fretboard lookups
    pub fn tonality(&self) -> Tonality {
        Tonality::new(self.key(), self.resolve_tuning())
    }

    /// Every tuning name this config can resolve
    pub fn available_tunings(&self) -> Vec<String> {
        TUNINGS
            .iter()
            .map(NamedTuning::name)
            .map(str::to_string)
            .chain(self.tunings.iter().map(|t| t.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
key_center: "D"
scale: "dorian"
tuning: "Drop D"
highest_octave: 4
"#;

        let config = FretwiseConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.key_center, "D");
        assert_eq!(config.frets, 12);

        let tonality = config.tonality();
        assert_eq!(tonality.key().name(), "D Dorian");
        assert_eq!(tonality.tuning().name(), "Drop D Tuning");
        assert_eq!(tonality.tuning().to_string(), "D2 A2 D3 G3 B3 E4");
    }

    #[test]
    fn test_defaults() {
        let config = FretwiseConfig::from_yaml("{}").unwrap();
        assert_eq!(config, FretwiseConfig::default());

        let tonality = config.tonality();
        assert_eq!(tonality.key().name(), "E Major");
        assert_eq!(tonality.tuning().to_string(), "E2 A2 D3 G3 B3 E4");
    }

    #[test]
    fn test_parse_toml_config() {
        let text = r#"
key_center = "Bb"
scale = "Blues"
tuning = "dadgad"
frets = 15

[[scales]]
name = "Blues"
intervals = [0, 3, 5, 6, 7, 10]

[[tunings]]
name = "DADGAD"
notes = "D A D G A D"
"#;

        let config = FretwiseConfig::from_toml(text).unwrap();
        assert_eq!(config.frets, 15);

        let key = config.key();
        assert_eq!(key.name(), "Bb Blues");
        assert_eq!(key.len(), 6);

        let tuning = config.resolve_tuning();
        assert_eq!(tuning.name(), "DADGAD");
        assert_eq!(tuning.to_string(), "D2 A2 D3 G3 A3 D4");
        assert!(config.available_tunings().contains(&"DADGAD".to_string()));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = FretwiseConfig {
            key_center: "H".to_string(),
            scale: "bebop".to_string(),
            tuning: "Nashville".to_string(),
            ..FretwiseConfig::default()
        };

        let tonality = config.tonality();
        assert_eq!(tonality.key().name(), "E Major");
        assert_eq!(tonality.tuning().name(), "Standard Tuning");
    }

    #[test]
    fn test_out_of_range_octaves_fall_back() {
        let yaml = r#"
tuning: "Drop D"
highest_octave: 999999999
"#;
        let config = FretwiseConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.highest_octave(), DEFAULT_HIGHEST_OCTAVE);
        assert!(config.find_tuning(&config.tuning).is_err());

        let tuning = config.resolve_tuning();
        assert_eq!(tuning.name(), "Drop D Tuning");
        assert_eq!(tuning.to_string(), "D2 A2 D3 G3 B3 E4");

        let config = FretwiseConfig {
            tuning: "E999999999 A".to_string(),
            ..FretwiseConfig::default()
        };
        assert_eq!(config.resolve_tuning().name(), "Standard Tuning");
    }

    #[test]
    fn test_tuning_string_in_config() {
        let config = FretwiseConfig {
            tuning: "E2AD G C F".to_string(),
            ..FretwiseConfig::default()
        };
        assert_eq!(config.resolve_tuning().to_string(), "E2 A2 D3 G3 C4 F4");
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempdir().unwrap();
        let config = FretwiseConfig {
            key_center: "F#".to_string(),
            scale: "Harmonic Minor".to_string(),
            scales: vec![CustomScaleDefinition {
                name: "Pentatonic".to_string(),
                intervals: vec![0, 2, 4, 7, 9],
            }],
            ..FretwiseConfig::default()
        };

        for name in ["song.yaml", "song.toml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = FretwiseConfig::load(&path).unwrap();
            assert_eq!(loaded, config);
        }

        let toml_text = std::fs::read_to_string(dir.path().join("song.toml")).unwrap();
        assert!(toml_text.contains("key_center = \"F#\""));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(FretwiseConfig::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(ConfigFormat::from_path("a/b.toml"), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("a/b.TOML"), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("a/b.yml"), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path("fretwise"), ConfigFormat::Yaml);
    }
}
