//! Ingestion pipeline from scraped pages to review records.
//!
//! # Responsibility
//! - Run score resolution and review construction for scraped pages.
//! - Own the diagnostics the pure stages leave to their caller.
//!
//! # Invariants
//! - Out-of-band pages never become reviews, not even unscored ones.
//! - Batch output keeps input order regardless of parallel execution.

pub mod page;
pub mod score;
pub mod tags;

use crate::config::PipelineConfig;
use crate::model::review::{Review, ReviewDraft};
use crate::model::score::Score;
use log::{info, warn};
use page::ScrapedPage;
use rayon::prelude::*;
use score::{resolve_score_with_marker, OutOfBandRecord};

/// Result of ingesting a batch of scraped pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Constructed reviews, in page order. May include invalid reviews.
    pub reviews: Vec<Review>,
    /// Number of out-of-band pages dropped.
    pub discarded: usize,
}

impl IngestReport {
    /// Reviews passing `Review::is_valid`.
    pub fn valid_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|review| review.is_valid())
    }
}

/// Resolves the score of one page and builds its review.
///
/// Logs `score_unresolved` when the review ends up with the sentinel score.
pub fn ingest_page(page: &ScrapedPage, config: &PipelineConfig) -> Result<Review, OutOfBandRecord> {
    let score = resolve_score_with_marker(
        &page.tags,
        &page.score_text_candidates,
        &config.keyword_table,
        &config.out_of_band_marker,
    )?;

    if score == Score::Unscored {
        warn!(
            "event=score_unresolved module=ingest status=unscored album={}",
            page.album
        );
    }

    let draft = ReviewDraft {
        album: page.album.clone(),
        artist: page.artist.clone(),
        author: page.author.clone(),
        date: page.date,
        tags: page.tags.clone(),
        score,
    };
    Ok(Review::with_site_suffix(draft, &config.site_suffix))
}

/// Ingests pages in parallel; output order follows input order.
pub fn ingest_batch(pages: &[ScrapedPage], config: &PipelineConfig) -> IngestReport {
    let outcomes: Vec<Result<Review, OutOfBandRecord>> = pages
        .par_iter()
        .map(|page| ingest_page(page, config))
        .collect();

    let mut report = IngestReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(review) => report.reviews.push(review),
            Err(discard) => {
                info!(
                    "event=record_discarded module=ingest status=out_of_band tag={}",
                    discard.tag
                );
                report.discarded += 1;
            }
        }
    }

    info!(
        "event=ingest_batch module=ingest status=ok pages={} reviews={} discarded={}",
        pages.len(),
        report.reviews.len(),
        report.discarded
    );
    report
}
