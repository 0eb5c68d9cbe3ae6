use chrono::NaiveDate;
use review_core::{
    group_by_author, ingest_batch, ingest_page, parse_published_date, split_page_title,
    PipelineConfig, Score, ScrapedPage,
};

fn page(album: &str, tags: &[&str], score_text: &[&str]) -> ScrapedPage {
    ScrapedPage {
        album: format!("{album} | Angry Metal Guy"),
        artist: "Artist".to_string(),
        author: "Steel Druhm".to_string(),
        date: NaiveDate::from_ymd_opt(2016, 3, 1),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        score_text_candidates: score_text.iter().map(|text| text.to_string()).collect(),
    }
}

#[test]
fn ingest_page_builds_normalized_review() {
    let config = PipelineConfig::default();
    let review = ingest_page(
        &page("Hymns", &["3.5", "Review", "Mar16", "Death Metal"], &["Rating: Great"]),
        &config,
    )
    .unwrap();

    assert_eq!(review.album(), "Hymns");
    assert_eq!(review.score(), Score::from_f64(3.5).unwrap());
    assert_eq!(review.tags().len(), 1);
    assert!(review.tags().contains("Death Metal"));
    assert!(review.is_valid());
}

#[test]
fn unresolved_page_becomes_unscored_review() {
    let config = PipelineConfig::default();
    let review = ingest_page(&page("Silent", &["Drone"], &["no verdict here"]), &config).unwrap();
    assert_eq!(review.score(), Score::Unscored);
    assert!(!review.is_valid());
}

#[test]
fn out_of_band_page_is_discarded() {
    let config = PipelineConfig::default();
    let outcome = ingest_page(
        &page("Roundup", &["Things You Might Have Missed"], &["Rating: Great"]),
        &config,
    );
    assert!(outcome.is_err());
}

#[test]
fn batch_keeps_input_order_and_counts_discards() {
    let config = PipelineConfig::default();
    let mut pages: Vec<ScrapedPage> = (0..40)
        .map(|idx| page(&format!("Album {idx:02}"), &["2.5"], &[]))
        .collect();
    pages.insert(7, page("Roundup", &["things you might have missed 2017"], &[]));
    pages.push(page("Unscored", &[], &[]));

    let report = ingest_batch(&pages, &config);
    assert_eq!(report.discarded, 1);
    assert_eq!(report.reviews.len(), 41);
    assert_eq!(report.valid_reviews().count(), 40);

    let albums: Vec<&str> = report.reviews.iter().map(|review| review.album()).collect();
    let mut expected: Vec<String> = (0..40).map(|idx| format!("Album {idx:02}")).collect();
    expected.push("Unscored".to_string());
    assert_eq!(albums, expected);
}

#[test]
fn ingested_reviews_feed_aggregation() {
    let config = PipelineConfig::default();
    let pages = vec![
        page("One", &["Doom"], &["Rating: 4.0/5.0"]),
        page("Two", &["Doom"], &["Rating: Very Good!"]),
        page("Three", &["Doom"], &[]),
    ];
    let report = ingest_batch(&pages, &config);
    let reviewers = group_by_author(report.reviews);

    let reviewer = &reviewers["Steel Druhm"];
    assert_eq!(reviewer.review_count(), 2);
    assert_eq!(reviewer.tag_counts(Default::default()), vec![("Doom".to_string(), 2)]);
}

#[test]
fn scrape_helpers_feed_page_fields() {
    let (artist, album) =
        split_page_title("Khemmis \u{2013} Hunted Review | Angry Metal Guy").unwrap();
    let scraped = ScrapedPage {
        album,
        artist,
        author: "Kronos".to_string(),
        date: parse_published_date("October 21, 2016"),
        tags: vec!["Doom Metal".to_string(), "4.5".to_string()],
        score_text_candidates: Vec::new(),
    };

    let review = ingest_page(&scraped, &PipelineConfig::default()).unwrap();
    assert_eq!(review.artist(), "Khemmis");
    assert_eq!(review.album(), "Hunted");
    assert_eq!(review.date(), NaiveDate::from_ymd_opt(2016, 10, 21));
    assert!(review.is_valid());
}
