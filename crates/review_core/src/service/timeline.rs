//! Calendar helpers for review timelines.
//!
//! # Responsibility
//! - Compute date spans and month offsets consumed by analytics/plotting.
//! - Build per-month score series for reviewer activity reports.
//!
//! # Invariants
//! - Month arithmetic ignores the day of month.
//! - Reviews without a date are ignored.

use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use chrono::{Datelike, NaiveDate};

/// Earliest and latest review dates; `None` when no review has a date.
pub fn date_range<'a, I>(reviews: I) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = &'a Review>,
{
    reviews
        .into_iter()
        .filter_map(Review::date)
        .fold(None, |range, date| match range {
            None => Some((date, date)),
            Some((min, max)) => Some((min.min(date), max.max(date))),
        })
}

/// Whole calendar months from `from` to `to`: `12*(y2-y1) - m1 + m2`.
///
/// Negative when `to` falls in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    12 * (to.year() - from.year()) - from.month() as i32 + to.month() as i32
}

/// `Mon-yy` labels for every month from `from` through `to`, inclusive.
pub fn month_labels(from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let span = months_between(from, to);
    if span < 0 {
        return Vec::new();
    }

    let mut labels = Vec::with_capacity(span as usize + 1);
    let (mut year, mut month) = (from.year(), from.month());
    for _ in 0..=span {
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            labels.push(first.format("%b-%y").to_string());
        }
        month += 1;
        if month == 13 {
            month = 1;
            year += 1;
        }
    }
    labels
}

/// Average score per month offset from `origin`.
///
/// Slot `i` covers the `i`-th month after `origin`'s month and is `Some`
/// only when that month holds more than `min_reviews` reviews. Reviews
/// outside `0..months` are ignored.
pub fn monthly_average_scores(
    reviewer: &Reviewer,
    origin: NaiveDate,
    months: usize,
    min_reviews: usize,
) -> Vec<Option<f64>> {
    let mut sums = vec![0.0; months];
    let mut counts = vec![0usize; months];

    for review in reviewer.reviews().iter().filter(|review| review.scored()) {
        let Some(date) = review.date() else {
            continue;
        };
        let Ok(offset) = usize::try_from(months_between(origin, date)) else {
            continue;
        };
        if offset < months {
            sums[offset] += review.score().as_f64();
            counts[offset] += 1;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > min_reviews).then(|| sum / count as f64))
        .collect()
}
