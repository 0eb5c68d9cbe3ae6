//! Domain model for album reviews and reviewers.
//!
//! # Responsibility
//! - Define the canonical review record and its score type.
//! - Define the reviewer aggregation root used by analytics.
//!
//! # Invariants
//! - Reviews are compared by content, never by identity.
//! - Construction is tolerant; validity is queried, not enforced.

pub mod review;
pub mod reviewer;
pub mod score;
