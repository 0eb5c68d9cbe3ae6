//! Review record codecs.
//!
//! # Responsibility
//! - Encode reviews as single-line JSON objects or CSV lines.
//! - Decode persisted records back into reviews without semantic drift.
//!
//! # Invariants
//! - For every valid review, decode(encode(r)) reproduces album, artist,
//!   author, date, score and the tag set.
//! - Decoding never runs score resolution; persisted scores are trusted.
//! - `CodecError::Incomplete` is only produced for JSON input that could
//!   still become a valid record with more lines.

pub mod csv;
pub mod json;

use crate::model::review::Review;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Date layout shared by both record formats.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

pub type CodecResult<T> = Result<T, CodecError>;

/// Record decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input is a prefix of a record; read more input and retry.
    Incomplete,
    /// Input can never decode; skip it.
    Malformed(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete => write!(f, "incomplete record"),
            Self::Malformed(message) => write!(f, "malformed record: {message}"),
        }
    }
}

impl Error for CodecError {}

/// On-disk record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// One JSON object per logical record; objects may span lines.
    JsonLines,
    /// One six-field CSV line per record, no header.
    CsvLines,
}

impl RecordFormat {
    /// Infers the format from a file extension: `.csv` is CSV, anything else
    /// is JSON lines.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::CsvLines,
            _ => Self::JsonLines,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonLines => "json_lines",
            Self::CsvLines => "csv_lines",
        }
    }

    /// Encodes one review as a single line without the trailing newline.
    pub fn encode(&self, review: &Review) -> String {
        match self {
            Self::JsonLines => json::to_json(review),
            Self::CsvLines => csv::to_csv(review),
        }
    }

    /// Decodes one complete record.
    pub fn decode(&self, record: &str) -> CodecResult<Review> {
        match self {
            Self::JsonLines => json::from_json(record),
            Self::CsvLines => csv::from_csv(record),
        }
    }
}
