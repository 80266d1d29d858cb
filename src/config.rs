//! Configuration file parser for ~/.config/reel/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde but logged as warnings since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::player::AutoplayPolicy;
use crate::shorts::FeedSettings;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds the maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Quiet period after the last scroll event before the active item is
    /// re-evaluated.
    pub scroll_debounce_ms: u64,

    /// Items on each side of the active one that keep their media attached.
    pub media_window: usize,

    /// Which start requests the simulated player accepts.
    pub autoplay_policy: AutoplayPolicy,

    /// Rows scrolled per key press.
    pub scroll_step: u16,

    /// Optional JSON catalog replacing the built-in items. Relative paths
    /// are taken from the config file's directory.
    pub catalog_path: Option<PathBuf>,

    /// Keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            scroll_debounce_ms: 100,
            media_window: 2,
            autoplay_policy: AutoplayPolicy::Allow,
            scroll_step: 3,
            catalog_path: None,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "theme",
        "scroll_debounce_ms",
        "media_window",
        "autoplay_policy",
        "scroll_step",
        "catalog_path",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file is never pulled into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse TOML content. Blank input yields the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            theme = %config.theme,
            autoplay = ?config.autoplay_policy,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    /// Rows per scroll key press, never less than one.
    pub fn scroll_step(&self) -> u16 {
        self.scroll_step.max(1)
    }

    /// The configured catalog path, with a relative path joined onto `base`.
    pub fn catalog_path_in(&self, base: &Path) -> Option<PathBuf> {
        self.catalog_path.as_ref().map(|path| {
            if path.is_relative() {
                base.join(path)
            } else {
                path.clone()
            }
        })
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            window_radius: self.media_window,
            scroll_debounce: self.scroll_debounce(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
