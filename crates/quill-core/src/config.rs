//! User settings read from `quill/config.toml`.
//!
//! ## Learning: Partial Files with `#[serde(default)]`
//!
//! Every section carries `#[serde(default)]`, so a file containing only
//! `[spelling] max_suggestions = 3` still parses. Missing keys take the
//! values from the `Default` impls below.

use quill_buffer::BufferConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing behavior settings
    pub editor: EditorConfig,

    /// Dictionary settings
    pub spelling: SpellingConfig,
}

impl Config {
    /// Reads the user's config file. A missing file yields defaults; an
    /// unreadable one is logged and also yields defaults.
    pub fn load() -> Self {
        let loaded = Self::default_path().and_then(|path| {
            if path.is_file() {
                Self::load_from(&path)
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        });

        loaded.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable config");
            Self::default()
        })
    }

    /// Parses a TOML config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// `<config dir>/quill/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("quill").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Saves the config to a file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Editing behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tab width in spaces
    pub tab_size: usize,

    /// Undo record limit (0 = unbounded)
    pub undo_limit: usize,
}

impl EditorConfig {
    /// Returns the matching buffer settings.
    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig {
            tab_width: self.tab_size,
            undo_limit: self.undo_limit,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            undo_limit: 0,
        }
    }
}

/// Spell checking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Word list, one word per line
    pub dictionary: Option<PathBuf>,

    /// Maximum corrections offered per word
    pub max_suggestions: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            max_suggestions: 10,
        }
    }
}

/// Errors reading or writing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No user config directory on this platform")]
    NoConfigDir,

    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
