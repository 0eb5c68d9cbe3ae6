//! Review persistence.
//!
//! # Responsibility
//! - Load review snapshots from line-oriented files.
//! - Append ingested reviews to snapshots.
//!
//! # Invariants
//! - Per-record decode failures are counted, never fatal.
//! - Only valid reviews are returned from loads.

pub mod review_repo;
