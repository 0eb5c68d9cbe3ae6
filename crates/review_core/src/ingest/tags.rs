//! Tag canonicalization.
//!
//! # Responsibility
//! - Drop tag tokens that carry no genre/topic meaning.
//!
//! # Invariants
//! - Rules apply per tag in order: numeric noise, site boilerplate,
//!   auto-generated month stamps. Everything else is kept verbatim.
//! - Normalization is idempotent and order-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

const BOILERPLATE_TAGS: &[&str] = &["review", "reviews", "release", "releases"];

// `Mar16` / `Mar2016`
static MONTH_STAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)(\d{2}|\d{4})$")
        .expect("valid month stamp regex")
});

/// Returns whether `tag` survives normalization unchanged.
pub fn is_canonical_tag(tag: &str) -> bool {
    if tag.trim().parse::<f64>().is_ok() {
        return false;
    }
    if BOILERPLATE_TAGS
        .iter()
        .any(|boilerplate| tag.eq_ignore_ascii_case(boilerplate))
    {
        return false;
    }
    if MONTH_STAMP_RE.is_match(tag) {
        return false;
    }
    !tag.is_empty()
}

/// Filters raw tag tokens into the canonical tag set.
pub fn normalize_tags<S: AsRef<str>>(raw_tags: &[S]) -> BTreeSet<String> {
    raw_tags
        .iter()
        .filter_map(|tag| {
            let tag: &str = tag.as_ref();
            is_canonical_tag(tag).then(|| tag.to_string())
        })
        .collect()
}
