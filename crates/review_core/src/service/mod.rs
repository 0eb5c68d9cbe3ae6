//! Analytics services over loaded reviews.
//!
//! # Responsibility
//! - Aggregate reviews per reviewer.
//! - Provide calendar utilities for timeline consumers.

pub mod reviewer_service;
pub mod timeline;
