//! Review file repository.
//!
//! # Responsibility
//! - Load persisted review records from JSON-lines or CSV-lines sources.
//! - Append newly ingested reviews to snapshot files.
//!
//! # Invariants
//! - A record that fails to decode or fails `Review::is_valid()` is counted
//!   as skipped and never aborts the load.
//! - Comment lines are only recognized at record boundaries.
//! - Only I/O failures of the source itself are returned as errors.
//! - Loading re-reads the source, so repeated loads see the same records.

use crate::codec::json::JsonRecordAssembler;
use crate::codec::{CodecResult, RecordFormat};
use crate::config::{PipelineConfig, DEFAULT_COMMENT_MARKER};
use crate::model::review::Review;
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Io(std::io::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "review file i/o failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Outcome of a batch load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Valid reviews, in source order.
    pub reviews: Vec<Review>,
    pub accepted: usize,
    /// Records dropped for decode failures or failed validity.
    pub skipped: usize,
}

impl LoadReport {
    fn record(&mut self, outcome: CodecResult<Review>) {
        match outcome {
            Ok(review) if review.is_valid() => {
                self.accepted += 1;
                self.reviews.push(review);
            }
            Ok(review) => {
                self.skipped += 1;
                debug!(
                    "event=record_skipped module=repo reason=invalid issues={}",
                    review.validity().len()
                );
            }
            Err(err) => {
                self.skipped += 1;
                debug!("event=record_skipped module=repo reason=decode error={err}");
            }
        }
    }
}

/// Snapshot file name for reviews scraped on `date`: `data_YYYYMMDD.txt`.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("data_{}.txt", date.format("%Y%m%d"))
}

/// Decodes every record of `source`.
///
/// JSON records may span several physical lines; a record left open at the
/// end of the source is counted as skipped.
pub fn load_reviews<R: BufRead>(
    mut source: R,
    format: RecordFormat,
    comment_marker: char,
) -> RepoResult<LoadReport> {
    let mut report = LoadReport::default();
    let mut assembler = JsonRecordAssembler::new();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        if source.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let Ok(text) = std::str::from_utf8(&raw) else {
            // Drops the partial record this line belonged to, if any.
            assembler.finish();
            report.skipped += 1;
            debug!("event=record_skipped module=repo reason=invalid_utf8");
            continue;
        };
        let line = text.trim_end_matches(['\n', '\r']);

        let at_boundary = format == RecordFormat::CsvLines || assembler.is_empty();
        if at_boundary && (line.trim().is_empty() || line.starts_with(comment_marker)) {
            continue;
        }

        match format {
            RecordFormat::CsvLines => report.record(format.decode(line)),
            RecordFormat::JsonLines => {
                for outcome in assembler.push_line(line) {
                    report.record(outcome);
                }
            }
        }
    }

    if let Some(err) = assembler.finish() {
        report.record(Err(err));
    }

    info!(
        "event=review_load module=repo status=ok format={} accepted={} skipped={}",
        format.as_str(),
        report.accepted,
        report.skipped
    );
    Ok(report)
}

/// Storage contract for persisted reviews.
pub trait ReviewRepository {
    /// Loads every valid review, counting skipped records.
    fn load(&self) -> RepoResult<LoadReport>;
    /// Appends all `reviews`; returns the number written.
    fn append(&self, reviews: &[Review]) -> RepoResult<usize>;
    /// Appends reviews whose album is not stored yet; returns the number
    /// written.
    fn append_new(&self, reviews: &[Review]) -> RepoResult<usize>;
}

/// Review repository over one snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReviewRepository {
    path: PathBuf,
    format: RecordFormat,
    comment_marker: char,
}

impl FileReviewRepository {
    pub fn new(path: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            path: path.into(),
            format,
            comment_marker: DEFAULT_COMMENT_MARKER,
        }
    }

    /// Infers the record format from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = RecordFormat::from_path(&path);
        Self::new(path, format)
    }

    /// Infers the record format from the file extension and takes the
    /// comment marker from `config`.
    pub fn with_config(path: impl Into<PathBuf>, config: &PipelineConfig) -> Self {
        Self::from_path(path).with_comment_marker(config.comment_marker)
    }

    pub fn with_comment_marker(mut self, comment_marker: char) -> Self {
        self.comment_marker = comment_marker;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    fn write_records<'a>(&self, reviews: impl Iterator<Item = &'a Review>) -> RepoResult<usize> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut written = 0;
        for review in reviews {
            writeln!(writer, "{}", self.format.encode(review))?;
            written += 1;
        }
        writer.flush()?;

        info!(
            "event=snapshot_append module=repo status=ok format={} written={} path={}",
            self.format.as_str(),
            written,
            self.path.display()
        );
        Ok(written)
    }
}

impl ReviewRepository for FileReviewRepository {
    fn load(&self) -> RepoResult<LoadReport> {
        let file = File::open(&self.path)?;
        load_reviews(BufReader::new(file), self.format, self.comment_marker)
    }

    fn append(&self, reviews: &[Review]) -> RepoResult<usize> {
        self.write_records(reviews.iter())
    }

    fn append_new(&self, reviews: &[Review]) -> RepoResult<usize> {
        let mut known: HashSet<String> = if self.path.exists() {
            self.load()?
                .reviews
                .into_iter()
                .map(|review| review.album().to_string())
                .collect()
        } else {
            HashSet::new()
        };

        let fresh: Vec<&Review> = reviews
            .iter()
            .filter(|review| known.insert(review.album().to_string()))
            .collect();
        self.write_records(fresh.into_iter())
    }
}
