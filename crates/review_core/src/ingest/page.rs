//! Scrape-source boundary.
//!
//! # Responsibility
//! - Define the per-page tuple handed over by the scraping collaborator.
//! - Normalize the few string-level conventions of the review site (page
//!   title layout, publication date format).
//!
//! Markup traversal and HTTP live outside this crate.

use chrono::NaiveDate;

const PUBLISHED_DATE_FORMAT: &str = "%B %d, %Y";

/// Raw fields scraped from one review page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPage {
    pub album: String,
    pub artist: String,
    pub author: String,
    pub date: Option<NaiveDate>,
    /// `article:tag` values, un-normalized.
    pub tags: Vec<String>,
    /// Score box texts in preference order; only the first is inspected.
    pub score_text_candidates: Vec<String>,
}

/// Splits a page title such as `"Artist – Album Review | Site"` into
/// `(artist, album)`.
///
/// Returns `None` when the title has no `" - "` separator.
pub fn split_page_title(title: &str) -> Option<(String, String)> {
    let normalized = title.trim().replace('\u{2013}', "-");
    let album_artist = normalized.split(" Review").next().unwrap_or("");
    let mut parts = album_artist.split(" - ");
    let artist = parts.next()?.trim();
    let album = parts.next()?.trim();
    Some((artist.to_string(), album.to_string()))
}

/// Parses a publication date such as `"March 1, 2016"`.
pub fn parse_published_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), PUBLISHED_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_published_date, split_page_title};
    use chrono::NaiveDate;

    #[test]
    fn split_page_title_handles_en_dash_and_review_suffix() {
        let parsed = split_page_title("Vektor \u{2013} Terminal Redux Review | Angry Metal Guy");
        assert_eq!(
            parsed,
            Some(("Vektor".to_string(), "Terminal Redux".to_string()))
        );
    }

    #[test]
    fn split_page_title_without_separator_is_none() {
        assert_eq!(split_page_title("Things You Might Have Missed 2016"), None);
    }

    #[test]
    fn parse_published_date_reads_long_month_format() {
        assert_eq!(
            parse_published_date(" March 1, 2016 "),
            NaiveDate::from_ymd_opt(2016, 3, 1)
        );
        assert_eq!(parse_published_date("2016-03-01"), None);
    }
}
