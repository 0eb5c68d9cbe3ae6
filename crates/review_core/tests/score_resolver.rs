use review_core::{resolve_score, resolve_score_with_marker, OutOfBandRecord, Score, ScoreKeywordTable};

fn score(value: f64) -> Score {
    Score::from_f64(value).unwrap()
}

#[test]
fn tag_embedded_score_wins_over_page_text() {
    let tags = ["Death Metal", "4.5", "Sweden"];
    let text = ["Rating: Mixed"];
    let resolved = resolve_score(&tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(4.5));
}

#[test]
fn explicit_fraction_is_used_when_tags_have_no_score() {
    let tags = ["Thrash Metal"];
    let text = ["Rating: 3.5/5.0<br/>DR: 6 | Format Reviewed: 320 kb/s mp3"];
    let resolved = resolve_score(&tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(3.5));
}

#[test]
fn fraction_beats_keyword_in_the_same_text() {
    let no_tags: [&str; 0] = [];
    let text = ["Rating: Great!<br/>Actually 2.0/5.0"];
    let resolved = resolve_score(&no_tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(2.0));
}

#[test]
fn longer_keyword_listed_first_wins_overlap() {
    let no_tags: [&str; 0] = [];
    let text = ["a very good record"];
    let resolved = resolve_score(&no_tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(3.5));
}

#[test]
fn keyword_priority_follows_table_order() {
    let no_tags: [&str; 0] = [];
    let text = ["a very good record"];
    let reordered = ScoreKeywordTable::from_pairs([("good", 3.0), ("very good", 3.5)]);
    let resolved = resolve_score(&no_tags, &text, &reordered).unwrap();
    assert_eq!(resolved, score(3.0));
    assert_eq!(
        reordered.shadowed_phrases(),
        vec![("good".to_string(), "very good".to_string())]
    );
}

#[test]
fn keyword_match_stops_at_first_matching_segment() {
    let no_tags: [&str; 0] = [];
    let text = ["Label: Nuclear Blast<br/>Rating: Disappointing!<br/>Perfect sound"];
    let resolved = resolve_score(&no_tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(2.0));
}

#[test]
fn keyword_match_ignores_case() {
    let no_tags: [&str; 0] = [];
    let text = ["RATING: EXCELLENT"];
    let resolved = resolve_score(&no_tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(4.5));
}

#[test]
fn only_first_text_candidate_is_inspected() {
    let no_tags: [&str; 0] = [];
    let text = ["Label: Unsigned", "Rating: 4.0/5.0"];
    let resolved = resolve_score(&no_tags, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, Score::Unscored);
}

#[test]
fn unresolvable_input_yields_sentinel() {
    let no_tags: [&str; 0] = [];
    let no_text: [&str; 0] = [];
    let resolved = resolve_score(&no_tags, &no_text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, Score::Unscored);
    assert_eq!(resolved.as_f64(), -1.0);
}

#[test]
fn out_of_band_marker_signals_discard_not_sentinel() {
    let tags = ["Things You Might Have Missed 2016", "4.0"];
    let text = ["Rating: Great"];
    let err = resolve_score(&tags, &text, &ScoreKeywordTable::default()).unwrap_err();
    assert_eq!(
        err,
        OutOfBandRecord {
            tag: "Things You Might Have Missed 2016".to_string()
        }
    );
}

#[test]
fn out_of_band_marker_is_configurable() {
    let tags = ["Yer Metal Is Olde"];
    let no_text: [&str; 0] = [];
    let table = ScoreKeywordTable::default();
    assert!(resolve_score_with_marker(&tags, &no_text, &table, "metal is olde").is_err());
    assert_eq!(
        resolve_score_with_marker(&tags, &no_text, &table, "").unwrap(),
        Score::Unscored
    );
}

#[test]
fn resolution_is_deterministic() {
    let tags = ["Prog"];
    let text = ["Rating: Good<br/>Bad production"];
    let table = ScoreKeywordTable::default();
    let first = resolve_score(&tags, &text, &table).unwrap();
    for _ in 0..10 {
        assert_eq!(resolve_score(&tags, &text, &table).unwrap(), first);
    }
    assert_eq!(first, score(3.0));
}

#[test]
fn tag_values_between_half_points_are_skipped() {
    let tags = ["3.7", "Progressive Metal", "2.5"];
    let no_text: [&str; 0] = [];
    let resolved = resolve_score(&tags, &no_text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(2.5));

    let only_between = ["3.7"];
    let text = ["Rating: 4.2/5.0<br/>Rating: Mixed"];
    let resolved = resolve_score(&only_between, &text, &ScoreKeywordTable::default()).unwrap();
    assert_eq!(resolved, score(2.5));
}
