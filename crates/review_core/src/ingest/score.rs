//! Score resolution from scraped tags and page text.
//!
//! # Responsibility
//! - Recover a numeric score from inconsistent page content through an
//!   ordered chain of heuristics.
//! - Signal out-of-band pages that must be discarded entirely.
//!
//! # Invariants
//! - Stage order is fixed: tag-embedded score, explicit `x.y/5.0` fraction,
//!   keyword phrase, unscored sentinel. The first stage to succeed wins.
//! - The out-of-band marker takes precedence over every stage.
//! - Keyword phrases are tried in table order; the table is never mutated.
//! - Resolution is pure: no logging, no I/O.

use crate::model::score::Score;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tag phrase marking a round-up post rather than an album review.
pub const OUT_OF_BAND_MARKER: &str = "things you might have missed";

static TAG_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d\.\d").expect("valid tag score regex"));
static FRACTION_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d\.\d)\s*/\s*5\.0").expect("valid fraction score regex"));
static SEGMENT_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|\r?\n").expect("valid segment break regex"));

/// The page is not an album review and must be dropped, not scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfBandRecord {
    /// Tag that carried the out-of-band marker.
    pub tag: String,
}

impl Display for OutOfBandRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "out-of-band record (tag `{}`)", self.tag)
    }
}

impl Error for OutOfBandRecord {}

/// One phrase of the site's score vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub phrase: String,
    pub score: f64,
}

/// Priority-ordered phrase to score table.
///
/// Earlier entries win when several phrases occur in the same segment, so a
/// longer phrase such as `very good` must precede the shorter `good`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreKeywordTable {
    entries: Vec<KeywordEntry>,
}

impl ScoreKeywordTable {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self { entries }
    }

    /// Builds a table from `(phrase, score)` pairs in priority order.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(phrase, score)| KeywordEntry {
                    phrase: phrase.into(),
                    score,
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs `(earlier, later)` where the earlier phrase is contained in the
    /// later one, which makes the later phrase unreachable.
    pub fn shadowed_phrases(&self) -> Vec<(String, String)> {
        let mut shadowed = Vec::new();
        for (idx, earlier) in self.entries.iter().enumerate() {
            let needle = earlier.phrase.to_lowercase();
            for later in &self.entries[idx + 1..] {
                if later.phrase.to_lowercase().contains(&needle) {
                    shadowed.push((earlier.phrase.clone(), later.phrase.clone()));
                }
            }
        }
        shadowed
    }

    /// First phrase, in table order, occurring case-insensitively in `segment`.
    pub fn match_segment(&self, segment: &str) -> Option<&KeywordEntry> {
        let haystack = segment.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| !entry.phrase.is_empty())
            .find(|entry| haystack.contains(&entry.phrase.to_lowercase()))
    }
}

impl Default for ScoreKeywordTable {
    fn default() -> Self {
        Self::from_pairs([
            ("perfect", 5.0),
            ("excellent", 4.5),
            ("great", 4.0),
            ("very good", 3.5),
            ("good", 3.0),
            ("mixed", 2.5),
            ("disappointing", 2.0),
            ("bad", 1.5),
            ("embarrassing", 1.0),
            ("pathetic", 0.5),
            ("worthless", 0.0),
        ])
    }
}

/// Resolves a score using [`OUT_OF_BAND_MARKER`] as the discard marker.
pub fn resolve_score<T: AsRef<str>, C: AsRef<str>>(
    tags: &[T],
    text_candidates: &[C],
    keywords: &ScoreKeywordTable,
) -> Result<Score, OutOfBandRecord> {
    resolve_score_with_marker(tags, text_candidates, keywords, OUT_OF_BAND_MARKER)
}

/// Resolves a score from tags, then the first text candidate.
///
/// Returns `Ok(Score::Unscored)` when no stage succeeds, and
/// `Err(OutOfBandRecord)` when any tag contains `marker`.
pub fn resolve_score_with_marker<T: AsRef<str>, C: AsRef<str>>(
    tags: &[T],
    text_candidates: &[C],
    keywords: &ScoreKeywordTable,
    marker: &str,
) -> Result<Score, OutOfBandRecord> {
    let marker = marker.to_lowercase();
    if !marker.is_empty() {
        for tag in tags {
            let tag: &str = tag.as_ref();
            if tag.to_lowercase().contains(&marker) {
                return Err(OutOfBandRecord {
                    tag: tag.to_string(),
                });
            }
        }
    }

    if let Some(score) = score_from_tags(tags) {
        return Ok(score);
    }

    let Some(text): Option<&str> = text_candidates.first().map(|text| text.as_ref()) else {
        return Ok(Score::Unscored);
    };

    if let Some(score) = score_from_fraction(text) {
        return Ok(score);
    }

    Ok(score_from_keywords(text, keywords).unwrap_or(Score::Unscored))
}

/// Stage 1: first on-scale `d.d` token found in the tag list.
pub fn score_from_tags<T: AsRef<str>>(tags: &[T]) -> Option<Score> {
    tags.iter()
        .flat_map(|tag| TAG_SCORE_RE.find_iter(tag.as_ref()))
        .find_map(|found| Score::parse_decimal(found.as_str()))
}

/// Stage 2: numerator of the first `d.d/5.0` fraction in `text`.
pub fn score_from_fraction(text: &str) -> Option<Score> {
    FRACTION_SCORE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|numerator| Score::parse_decimal(numerator.as_str()))
}

/// Stage 3: first segment containing a keyword phrase.
pub fn score_from_keywords(text: &str, keywords: &ScoreKeywordTable) -> Option<Score> {
    keyword_segments(text)
        .into_iter()
        .find_map(|segment| keywords.match_segment(segment))
        .and_then(|entry| Score::from_f64(entry.score))
        .filter(Score::is_scored)
}

/// Splits score text into line-like segments.
///
/// Segments break on `<br>` variants and newlines, are trimmed, and are cut
/// at the first `!`.
pub fn keyword_segments(text: &str) -> Vec<&str> {
    SEGMENT_BREAK_RE
        .split(text)
        .map(|segment| segment.trim().split('!').next().unwrap_or("").trim())
        .filter(|segment| !segment.is_empty())
        .collect()
}
