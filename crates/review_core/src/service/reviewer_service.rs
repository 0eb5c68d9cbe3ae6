//! Reviewer aggregation.
//!
//! # Responsibility
//! - Group scored reviews into reviewers keyed by author name.
//!
//! # Invariants
//! - Unscored reviews and reviews with an empty album never reach a
//!   reviewer, and never cause one to be created.
//! - The input is scanned once; reviewers are never removed.

use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use std::collections::BTreeMap;

/// Groups `reviews` by author.
pub fn group_by_author<I>(reviews: I) -> BTreeMap<String, Reviewer>
where
    I: IntoIterator<Item = Review>,
{
    let mut reviewers: BTreeMap<String, Reviewer> = BTreeMap::new();
    for review in reviews {
        if !review.scored() || review.album().is_empty() {
            continue;
        }

        let name = review.author().to_string();
        reviewers
            .entry(name)
            .or_insert_with_key(|name| Reviewer::new(name.as_str()))
            .add_review(review);
    }
    reviewers
}

/// Reviewers ordered by ascending review count, ties by name.
pub fn reviewers_by_review_count(reviewers: &BTreeMap<String, Reviewer>) -> Vec<&Reviewer> {
    let mut ordered: Vec<&Reviewer> = reviewers.values().collect();
    ordered.sort_by_key(|reviewer| reviewer.review_count());
    ordered
}
