//! Pipeline configuration.
//!
//! # Responsibility
//! - Hold the read-only settings shared by ingestion and storage.
//! - Load settings from JSON with per-field defaults.
//!
//! # Invariants
//! - A loaded config is validated before it is returned.
//! - The keyword table is never mutated after loading.

use crate::ingest::score::{ScoreKeywordTable, OUT_OF_BAND_MARKER};
use crate::logging::{init_logging, LoggingConfig, LoggingError};
use crate::model::review::DEFAULT_SITE_SUFFIX;
use crate::model::score::Score;
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Comment prefix for persisted review files.
pub const DEFAULT_COMMENT_MARKER: char = '#';

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for ingestion, storage and logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Priority-ordered score vocabulary for keyword resolution.
    pub keyword_table: ScoreKeywordTable,
    /// Annotation stripped from album titles.
    pub site_suffix: String,
    /// Tag phrase that marks a page as out-of-band.
    pub out_of_band_marker: String,
    /// Lines starting with this character are skipped by repositories built
    /// with `FileReviewRepository::with_config`.
    pub comment_marker: char,
    /// Applied by [`PipelineConfig::init_logging`].
    pub logging: LoggingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keyword_table: ScoreKeywordTable::default(),
            site_suffix: DEFAULT_SITE_SUFFIX.to_string(),
            out_of_band_marker: OUT_OF_BAND_MARKER.to_string(),
            comment_marker: DEFAULT_COMMENT_MARKER,
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Starts file logging with the `logging` section.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        init_logging(&self.logging)
    }

    /// Checks keyword entries; shadowed phrases are only warned about.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword_table.is_empty() {
            return Err(ConfigError::Invalid("keyword_table is empty".to_string()));
        }
        for entry in self.keyword_table.entries() {
            if entry.phrase.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "keyword_table contains an empty phrase".to_string(),
                ));
            }
            if !Score::from_f64(entry.score).is_some_and(|score| score.is_scored()) {
                return Err(ConfigError::Invalid(format!(
                    "keyword `{}` maps to off-scale score {}",
                    entry.phrase, entry.score
                )));
            }
        }
        for (earlier, later) in self.keyword_table.shadowed_phrases() {
            warn!(
                "event=config_validate module=config status=shadowed earlier={} later={}",
                earlier, later
            );
        }
        Ok(())
    }
}
