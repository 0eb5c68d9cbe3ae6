//! JSON-lines review codec.
//!
//! # Responsibility
//! - Encode a review as one compact JSON object.
//! - Decode objects, reporting prefixes as `CodecError::Incomplete`.
//! - Reassemble records that were persisted across several physical lines.
//!
//! # Invariants
//! - Encoded keys are `album, artist, author, date, score, tags`.
//! - `tags` array order is unspecified.
//! - A missing date encodes as `null`; the unscored sentinel as `-1.0`.

use super::{CodecError, CodecResult, RECORD_DATE_FORMAT};
use crate::model::review::{Review, ReviewDraft};
use crate::model::score::Score;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ReviewRecord {
    album: String,
    artist: String,
    author: String,
    date: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    score: f64,
}

/// Encodes `review` as a single-line JSON object.
pub fn to_json(review: &Review) -> String {
    let date = review
        .date()
        .map(|date| date.format(RECORD_DATE_FORMAT).to_string());
    json!({
        "album": review.album(),
        "artist": review.artist(),
        "author": review.author(),
        "date": date,
        "tags": review.tags(),
        "score": review.score().as_f64(),
    })
    .to_string()
}

/// Decodes one JSON object.
///
/// # Errors
/// - `Incomplete` when `input` ends before the object is closed.
/// - `Malformed` for anything else that fails to decode.
pub fn from_json(input: &str) -> CodecResult<Review> {
    match input.trim_start().chars().next() {
        None => return Err(CodecError::Incomplete),
        Some('{') => {}
        Some(other) => {
            return Err(CodecError::Malformed(format!(
                "expected a JSON object, found `{other}`"
            )))
        }
    }

    let record: ReviewRecord = serde_json::from_str(input).map_err(|err| match err.classify() {
        Category::Eof => CodecError::Incomplete,
        _ => CodecError::Malformed(err.to_string()),
    })?;

    let date = match record.date.as_deref() {
        None => None,
        Some(text) => Some(
            NaiveDate::parse_from_str(text, RECORD_DATE_FORMAT)
                .map_err(|err| CodecError::Malformed(format!("invalid date `{text}`: {err}")))?,
        ),
    };
    let score = Score::from_f64(record.score).ok_or_else(|| {
        CodecError::Malformed(format!("score {} is off the half-point scale", record.score))
    })?;

    Ok(Review::new(ReviewDraft {
        album: record.album,
        artist: record.artist,
        author: record.author,
        date,
        tags: record.tags,
        score,
    }))
}

/// Buffers physical lines until they form a complete JSON record.
///
/// Line breaks that fall inside a string literal are re-joined as an escaped
/// `\n` so the buffered text stays valid JSON. When a buffered record turns
/// out malformed on a line that opens a new object, that line is retried on
/// its own so a truncated record does not swallow the one after it.
#[derive(Debug, Default)]
pub struct JsonRecordAssembler {
    buffer: String,
    in_string: bool,
    escaped: bool,
}

impl JsonRecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no partial record is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Appends one physical line (without its line terminator).
    ///
    /// Returns no outcome while the record is still incomplete. Otherwise
    /// returns the decode outcome, preceded by the `Malformed` outcome of the
    /// abandoned record when the line was retried on its own.
    pub fn push_line(&mut self, line: &str) -> Vec<CodecResult<Review>> {
        let continuation = !self.buffer.is_empty();
        if continuation {
            if self.in_string {
                self.buffer.push_str("\\n");
                self.escaped = false;
            } else {
                self.buffer.push('\n');
            }
        }
        self.scan(line);
        self.buffer.push_str(line);

        match from_json(&self.buffer) {
            Err(CodecError::Incomplete) => Vec::new(),
            Err(err @ CodecError::Malformed(_))
                if continuation && line.trim_start().starts_with('{') =>
            {
                self.reset();
                let mut outcomes = vec![Err(err)];
                outcomes.extend(self.push_line(line));
                outcomes
            }
            outcome => {
                self.reset();
                vec![outcome]
            }
        }
    }

    /// Ends input; a buffered partial record becomes `Incomplete`.
    pub fn finish(&mut self) -> Option<CodecError> {
        let pending = !self.buffer.trim().is_empty();
        self.reset();
        pending.then_some(CodecError::Incomplete)
    }

    fn scan(&mut self, line: &str) {
        for ch in line.chars() {
            if self.escaped {
                self.escaped = false;
            } else if self.in_string && ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = !self.in_string;
            }
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.in_string = false;
        self.escaped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{from_json, JsonRecordAssembler};
    use crate::codec::CodecError;

    #[test]
    fn truncated_object_is_incomplete() {
        assert_eq!(
            from_json(r#"{"album": "Ride", "artist""#).unwrap_err(),
            CodecError::Incomplete
        );
    }

    #[test]
    fn non_object_input_is_malformed() {
        assert!(matches!(from_json("[1, 2"), Err(CodecError::Malformed(_))));
        assert!(matches!(from_json("garbage"), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn assembler_escapes_breaks_inside_strings() {
        let mut assembler = JsonRecordAssembler::new();
        assert!(assembler.push_line(r#"{"album": "Two"#).is_empty());
        let mut outcomes = assembler.push_line(
            r#"Lines", "artist": "A", "author": "B", "date": "2016-01-02", "tags": [], "score": 3.0}"#,
        );
        assert_eq!(outcomes.len(), 1);
        let review = outcomes.remove(0).expect("record should decode");
        assert_eq!(review.album(), "Two\nLines");
        assert!(assembler.is_empty());
    }

    #[test]
    fn assembler_retries_object_after_truncated_record() {
        let mut assembler = JsonRecordAssembler::new();
        assert!(assembler.push_line(r#"{"album": "Cut", "artist"#).is_empty());
        let outcomes = assembler.push_line(
            r#"{"album": "Kept", "artist": "A", "author": "B", "date": "2016-01-02", "tags": [], "score": 3.0}"#,
        );
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], Err(CodecError::Malformed(_))));
        assert_eq!(outcomes[1].as_ref().unwrap().album(), "Kept");
        assert!(assembler.is_empty());
    }

    #[test]
    fn assembler_does_not_retry_interior_lines() {
        let mut assembler = JsonRecordAssembler::new();
        assert!(assembler.push_line("{").is_empty());
        let outcomes = assembler.push_line("  broken");
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], Err(CodecError::Malformed(_))));
        assert!(assembler.is_empty());
    }

    #[test]
    fn assembler_finish_reports_dangling_record() {
        let mut assembler = JsonRecordAssembler::new();
        assert!(assembler.push_line("{").is_empty());
        assert_eq!(assembler.finish(), Some(CodecError::Incomplete));
        assert_eq!(assembler.finish(), None);
    }
}
