//! Review domain model.
//!
//! # Responsibility
//! - Define the canonical album review record shared by ingestion, storage
//!   and aggregation.
//! - Keep construction tolerant: noisy scraped input never fails to build.
//!
//! # Invariants
//! - `album` never carries the site suffix annotation.
//! - `tags` only contains canonical tags (see `ingest::tags`).
//! - The only post-construction transition is the author rebind performed
//!   when a reviewer claims the review.
//! - Validity is advisory: callers filter with `is_valid()`.

use crate::ingest::tags::normalize_tags;
use crate::model::score::Score;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Album suffix appended to page titles by the review site.
pub const DEFAULT_SITE_SUFFIX: &str = " | Angry Metal Guy";

/// Raw review fields as delivered by a scrape source or a decoded record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub album: String,
    pub artist: String,
    pub author: String,
    pub date: Option<NaiveDate>,
    /// Un-normalized tag tokens.
    pub tags: Vec<String>,
    pub score: Score,
}

/// One album review.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Review {
    album: String,
    artist: String,
    author: String,
    date: Option<NaiveDate>,
    tags: BTreeSet<String>,
    score: Score,
}

/// A single failed validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityIssue {
    EmptyAlbum,
    EmptyArtist,
    EmptyAuthor,
    MissingDate,
    Unscored,
}

impl Display for ValidityIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAlbum => write!(f, "album is empty"),
            Self::EmptyArtist => write!(f, "artist is empty"),
            Self::EmptyAuthor => write!(f, "author is empty"),
            Self::MissingDate => write!(f, "date is missing"),
            Self::Unscored => write!(f, "score is unresolved"),
        }
    }
}

/// Outcome of binding a review to a reviewer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorRebind {
    /// The author field was empty and now holds the reviewer name.
    Assigned,
    /// The author field already matched the reviewer name.
    Unchanged,
    /// A different, non-empty author was replaced.
    Overwritten { previous: String },
}

impl Review {
    /// Builds a review, stripping the default site suffix from the album.
    pub fn new(draft: ReviewDraft) -> Self {
        Self::with_site_suffix(draft, DEFAULT_SITE_SUFFIX)
    }

    /// Builds a review, stripping `site_suffix` (and anything after it)
    /// from the album title.
    ///
    /// Never fails; check [`Review::is_valid`] afterwards.
    pub fn with_site_suffix(draft: ReviewDraft, site_suffix: &str) -> Self {
        Self {
            album: strip_site_suffix(&draft.album, site_suffix),
            artist: draft.artist,
            author: draft.author,
            date: draft.date,
            tags: normalize_tags(&draft.tags),
            score: draft.score,
        }
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Whether a score was resolved for this review.
    pub fn scored(&self) -> bool {
        self.score.is_scored()
    }

    /// True when every required field was filled and a score was resolved.
    pub fn is_valid(&self) -> bool {
        self.validity().is_empty()
    }

    /// Lists every failed validity check, in field order.
    pub fn validity(&self) -> Vec<ValidityIssue> {
        let mut issues = Vec::new();
        if self.album.is_empty() {
            issues.push(ValidityIssue::EmptyAlbum);
        }
        if self.artist.is_empty() {
            issues.push(ValidityIssue::EmptyArtist);
        }
        if self.author.is_empty() {
            issues.push(ValidityIssue::EmptyAuthor);
        }
        if self.date.is_none() {
            issues.push(ValidityIssue::MissingDate);
        }
        if !self.score.is_scored() {
            issues.push(ValidityIssue::Unscored);
        }
        issues
    }

    /// Binds this review to `name`, returning the rebound review and what
    /// happened to the previous author.
    ///
    /// Callers that keep the previous value should warn on
    /// [`AuthorRebind::Overwritten`].
    pub fn rebind_author(mut self, name: &str) -> (Self, AuthorRebind) {
        let outcome = if self.author == name {
            AuthorRebind::Unchanged
        } else if self.author.is_empty() {
            AuthorRebind::Assigned
        } else {
            AuthorRebind::Overwritten {
                previous: std::mem::take(&mut self.author),
            }
        };

        if outcome != AuthorRebind::Unchanged {
            self.author = name.to_string();
        }
        (self, outcome)
    }
}

impl Display for Review {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let date = self
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        write!(
            f,
            "Review of {} by {}. Reviewer: {} on {}. Score: {}",
            self.album, self.artist, self.author, date, self.score
        )
    }
}

fn strip_site_suffix(album: &str, site_suffix: &str) -> String {
    let head = if site_suffix.is_empty() {
        album
    } else {
        album.split(site_suffix).next().unwrap_or(album)
    };
    head.trim().to_string()
}
