//! Configuration file parser for ~/.config/rss-items/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are ignored by serde but logged, since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::feed::{
    ImageStrategy, PipelineOptions, DEFAULT_MAX_EXCERPT_LENGTH, DEFAULT_MAX_TITLE_LENGTH,
    DEFAULT_TIMEOUT,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// The read-more fields are plain display strings and are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed URL to fetch when none is given on the command line.
    pub url: Option<String>,

    /// Maximum number of items shown. Absent = all items, 0 or negative = none.
    pub max_items: Option<i64>,

    /// Maximum title length in characters (0 = no truncation).
    pub max_title_length: usize,

    /// Maximum excerpt length in characters (0 = no truncation).
    pub max_excerpt_length: usize,

    /// Take images only from the first `<img>` of this item field
    /// (e.g. "description"), skipping thumbnails.
    pub image_field: Option<String>,

    /// Time budget for fetching the feed, in seconds.
    pub request_timeout_secs: u64,

    /// Whether items carry a "read more" link.
    pub show_read_more: bool,

    /// Text of the read-more link.
    pub read_more_anchor_text: String,

    /// Tooltip prefix of the read-more link; the item title is appended.
    pub read_more_anchor_title: String,

    /// Alternative text of the read-more icon.
    pub read_more_image_alt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            max_items: None,
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            max_excerpt_length: DEFAULT_MAX_EXCERPT_LENGTH,
            image_field: None,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            show_read_more: false,
            read_more_anchor_text: "Leer más".to_string(),
            read_more_anchor_title: "Leer más sobre: ".to_string(),
            read_more_image_alt: "Icono de flecha".to_string(),
        }
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "url",
        "max_items",
        "max_title_length",
        "max_excerpt_length",
        "image_field",
        "request_timeout_secs",
        "show_read_more",
        "read_more_anchor_text",
        "read_more_anchor_title",
        "read_more_image_alt",
    ];

    /// Default config path: `$HOME/.config/rss-items/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("rss-items")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading
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
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
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
            url = config.url.as_deref().unwrap_or("-"),
            max_items = ?config.max_items,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Pipeline bounds described by this configuration.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_items: self.max_items,
            max_title_length: Some(self.max_title_length),
            max_excerpt_length: Some(self.max_excerpt_length),
            image_strategy: ImageStrategy::from_field(self.image_field.as_deref()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
