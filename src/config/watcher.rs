// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reload configuration.
//!
//! Watches a config file (or a directory of them) and reloads it after
//! edits settle, so a running session can follow key and tuning changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::FretwiseConfig;
use crate::music::note::Note;
use crate::music::pitch::check_octave;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Configuration file was modified and successfully reloaded
    Reloaded(Box<FretwiseConfig>),
    /// Configuration file was modified but failed to parse
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Configuration file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new config watcher for the specified path
    ///
    /// The watcher will monitor the file (or directory) for changes
    /// and emit `ConfigEvent`s when config files are modified.
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let mut queue = ReloadQueue::new(watched_path.clone(), debounce);
        std::thread::spawn(move || loop {
            let events = match notify_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => queue.push(event),
                Err(mpsc::RecvTimeoutError::Timeout) => queue.flush(Instant::now()),
                // Watcher was dropped
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next config event is received
    pub fn recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// YAML or TOML by extension
fn is_config_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml" | "toml")
    )
}

/// Debounces raw notify events into config events.
///
/// Modified config files wait until no event has arrived for the debounce
/// period, then reload once. A reload that yields the same config as the
/// previous one for that file is dropped.
struct ReloadQueue {
    watched_path: PathBuf,
    debounce: Duration,
    pending: Vec<PathBuf>,
    last_event: Option<Instant>,
    loaded: HashMap<PathBuf, FretwiseConfig>,
}

impl ReloadQueue {
    fn new(watched_path: PathBuf, debounce: Duration) -> Self {
        Self {
            watched_path,
            debounce,
            pending: Vec::new(),
            last_event: None,
            loaded: HashMap::new(),
        }
    }

    fn tracks(&self, path: &Path) -> bool {
        path == self.watched_path || is_config_file(path)
    }

    /// Take in one notify event; creations and removals pass straight through
    fn push(&mut self, event: Event) -> Vec<ConfigEvent> {
        let paths = event.paths.into_iter().filter(|path| self.tracks(path));
        match event.kind {
            EventKind::Create(_) => paths.map(ConfigEvent::FileCreated).collect(),
            EventKind::Remove(_) => {
                let removed: Vec<PathBuf> = paths.collect();
                for path in &removed {
                    self.loaded.remove(path);
                }
                removed.into_iter().map(ConfigEvent::FileDeleted).collect()
            }
            EventKind::Modify(_) => {
                let modified: Vec<PathBuf> = paths.collect();
                if !modified.is_empty() {
                    for path in modified {
                        if !self.pending.contains(&path) {
                            self.pending.push(path);
                        }
                    }
                    self.last_event = Some(Instant::now());
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Reload pending files once the debounce period has passed at `now`
    fn flush(&mut self, now: Instant) -> Vec<ConfigEvent> {
        match self.last_event {
            Some(last) if now.duration_since(last) >= self.debounce => {}
            _ => return Vec::new(),
        }
        self.last_event = None;

        let mut events = Vec::new();
        for path in std::mem::take(&mut self.pending) {
            match reload(&path) {
                ConfigEvent::Reloaded(config) => {
                    if self.loaded.get(&path) == Some(&*config) {
                        debug!(?path, "Config unchanged, skipping reload");
                        continue;
                    }
                    self.loaded.insert(path, (*config).clone());
                    events.push(ConfigEvent::Reloaded(config));
                }
                other => events.push(other),
            }
        }
        events
    }
}

fn reload(path: &Path) -> ConfigEvent {
    match validate_config(path) {
        Ok(config) => {
            debug!(?path, "Config reloaded");
            ConfigEvent::Reloaded(Box::new(config))
        }
        Err(e) => {
            warn!(?path, error = %e, "Config reload failed");
            ConfigEvent::Error(format!("Failed to load {:?}: {}", path, e))
        }
    }
}

/// Load a configuration and check that its key, scale and tuning resolve.
///
/// Unlike [`FretwiseConfig::tonality`], nothing falls back to a default.
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<FretwiseConfig> {
    let config = FretwiseConfig::load(&path)?;
    check_octave(config.highest_octave).context("Invalid highest octave")?;
    let keynote = config
        .key_center
        .parse::<Note>()
        .with_context(|| format!("Invalid key center {:?}", config.key_center))?;
    config
        .scale_registry()
        .get_key(keynote, &config.scale)
        .with_context(|| format!("Invalid scale {:?}", config.scale))?;
    config
        .find_tuning(&config.tuning)
        .with_context(|| format!("Invalid tuning {:?}", config.tuning))?;
    Ok(config)
}
