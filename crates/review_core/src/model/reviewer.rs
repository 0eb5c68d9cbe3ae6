//! Reviewer aggregation root.
//!
//! # Responsibility
//! - Group reviews under one author name.
//! - Answer per-reviewer tag and score statistics.
//!
//! # Invariants
//! - Every review held by a reviewer has `author == name`.
//! - Reviews are value objects; identical reviews collapse into one entry.

use crate::model::review::{AuthorRebind, Review};
use crate::model::score::SCORE_BUCKETS;
use log::warn;
use std::collections::{BTreeMap, BTreeSet};

/// Sort direction for [`Reviewer::tag_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// An author together with the reviews attributed to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    name: String,
    reviews: BTreeSet<Review>,
}

impl Reviewer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reviews: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reviews(&self) -> &BTreeSet<Review> {
        &self.reviews
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Claims `review` for this reviewer, rebinding its author field.
    ///
    /// Overwriting a different non-empty author is logged, never rejected.
    pub fn add_review(&mut self, review: Review) -> AuthorRebind {
        let (review, outcome) = review.rebind_author(&self.name);
        if let AuthorRebind::Overwritten { previous } = &outcome {
            warn!(
                "event=author_rebind module=model status=overwritten reviewer={} previous={}",
                self.name, previous
            );
        }
        self.reviews.insert(review);
        outcome
    }

    /// Union of tags across all reviews, in alphabetical order.
    pub fn tag_list(&self) -> Vec<String> {
        self.reviews
            .iter()
            .flat_map(|review| review.tags().iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of reviews carrying each tag, sorted by count.
    ///
    /// Ties keep the alphabetical order of [`Reviewer::tag_list`] in both
    /// directions (stable sort).
    pub fn tag_counts(&self, order: SortOrder) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for review in &self.reviews {
            for tag in review.tags() {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut pairs: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        match order {
            SortOrder::Ascending => pairs.sort_by(|a, b| a.1.cmp(&b.1)),
            SortOrder::Descending => pairs.sort_by(|a, b| b.1.cmp(&a.1)),
        }
        pairs
    }

    /// Scores of every review, in review order.
    pub fn score_list(&self) -> Vec<f64> {
        self.reviews
            .iter()
            .map(|review| review.score().as_f64())
            .collect()
    }

    /// Mean of rated scores; `None` when nothing is rated.
    pub fn mean_score(&self) -> Option<f64> {
        let rated: Vec<f64> = self
            .reviews
            .iter()
            .filter(|review| review.scored())
            .map(|review| review.score().as_f64())
            .collect();
        if rated.is_empty() {
            return None;
        }
        Some(rated.iter().sum::<f64>() / rated.len() as f64)
    }

    /// Half-point histogram over `0.0..=5.0`, indexed by `round(score * 2)`.
    pub fn score_counts(&self) -> [u32; SCORE_BUCKETS] {
        let mut histogram = [0u32; SCORE_BUCKETS];
        for review in &self.reviews {
            if let Some(bucket) = review.score().histogram_bucket() {
                histogram[bucket] += 1;
            }
        }
        histogram
    }
}
