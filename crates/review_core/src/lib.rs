//! Core pipeline for album review records.
//! Turns scraped review fields into validated reviews, persists them as
//! JSON or CSV lines, and aggregates them per reviewer.

pub mod codec;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::csv::{from_csv, to_csv};
pub use codec::json::{from_json, to_json, JsonRecordAssembler};
pub use codec::{CodecError, CodecResult, RecordFormat};
pub use config::{ConfigError, PipelineConfig};
pub use ingest::page::{parse_published_date, split_page_title, ScrapedPage};
pub use ingest::score::{
    resolve_score, resolve_score_with_marker, KeywordEntry, OutOfBandRecord, ScoreKeywordTable,
};
pub use ingest::tags::normalize_tags;
pub use ingest::{ingest_batch, ingest_page, IngestReport};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::review::{AuthorRebind, Review, ReviewDraft, ValidityIssue};
pub use model::reviewer::{Reviewer, SortOrder};
pub use model::score::{Score, SCORE_BUCKETS};
pub use repo::review_repo::{
    load_reviews, snapshot_file_name, FileReviewRepository, LoadReport, RepoError, RepoResult,
    ReviewRepository,
};
pub use service::reviewer_service::{group_by_author, reviewers_by_review_count};
pub use service::timeline::{date_range, month_labels, monthly_average_scores, months_between};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
