//! Minimal CSV review codec.
//!
//! This is a fixed six-column dialect, not general CSV:
//!
//! ```text
//! "album","artist","author",2016-03-01,"tag one;tag two",3.5
//! ```
//!
//! - Text columns are always quoted on output. Inside quotes, a quote is
//!   doubled and `\`, line feed and carriage return are written `\\`, `\n`
//!   and `\r`. Unquoted text columns are accepted on input but may not
//!   contain a quote.
//! - The tag column joins tags with `;`. Inside a tag, `\` is written `\\`
//!   and `;` is written `\;`; the joined list is then quoted as above.
//! - The date column is empty when the review has no date.
//! - Records never span physical lines.

use super::{CodecError, CodecResult, RECORD_DATE_FORMAT};
use crate::model::review::{Review, ReviewDraft};
use crate::model::score::Score;
use chrono::NaiveDate;

const FIELD_SEPARATOR: char = ',';
const QUOTE: char = '"';
const TAG_SEPARATOR: char = ';';
const ESCAPE: char = '\\';
const FIELD_COUNT: usize = 6;

/// Encodes `review` as one CSV line without a trailing newline.
pub fn to_csv(review: &Review) -> String {
    let tag_list = review
        .tags()
        .iter()
        .map(|tag| escape_tag(tag))
        .collect::<Vec<_>>()
        .join(";");
    let date = review
        .date()
        .map(|date| date.format(RECORD_DATE_FORMAT).to_string())
        .unwrap_or_default();

    [
        quote(review.album()),
        quote(review.artist()),
        quote(review.author()),
        date,
        quote(&tag_list),
        review.score().to_string(),
    ]
    .join(",")
}

/// Decodes one CSV line produced by [`to_csv`].
///
/// # Errors
/// - `Malformed` for a wrong column count, broken quoting, an unparsable date
///   or a score off the half-point scale.
pub fn from_csv(line: &str) -> CodecResult<Review> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields = split_fields(line)?;
    if fields.len() != FIELD_COUNT {
        return Err(CodecError::Malformed(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let date_text = fields[3].trim();
    let date = if date_text.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(date_text, RECORD_DATE_FORMAT).map_err(|err| {
                CodecError::Malformed(format!("invalid date `{date_text}`: {err}"))
            })?,
        )
    };

    let score_text = fields[5].trim();
    let score = score_text
        .parse::<f64>()
        .ok()
        .and_then(Score::from_f64)
        .ok_or_else(|| CodecError::Malformed(format!("invalid score `{score_text}`")))?;

    let mut fields = fields.into_iter();
    let album = fields.next().unwrap_or_default();
    let artist = fields.next().unwrap_or_default();
    let author = fields.next().unwrap_or_default();
    let tags = split_tag_list(&fields.nth(1).unwrap_or_default())?;

    Ok(Review::new(ReviewDraft {
        album,
        artist,
        author,
        date,
        tags,
        score,
    }))
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(QUOTE);
    for ch in value.chars() {
        match ch {
            QUOTE => quoted.push_str("\"\""),
            ESCAPE => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push(QUOTE);
    quoted
}

fn escape_tag(tag: &str) -> String {
    let mut escaped = String::with_capacity(tag.len());
    for ch in tag.chars() {
        if ch == ESCAPE || ch == TAG_SEPARATOR {
            escaped.push(ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn split_fields(line: &str) -> CodecResult<Vec<String>> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut field = String::new();
    let mut in_quotes = false;
    let mut closed_quote = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => {
                    in_quotes = false;
                    closed_quote = true;
                }
                ESCAPE => match chars.next() {
                    Some('n') => field.push('\n'),
                    Some('r') => field.push('\r'),
                    Some(ESCAPE) => field.push(ESCAPE),
                    other => {
                        return Err(CodecError::Malformed(format!(
                            "invalid escape `\\{}` in quoted field",
                            other.map(String::from).unwrap_or_default()
                        )));
                    }
                },
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            FIELD_SEPARATOR => {
                fields.push(std::mem::take(&mut field));
                closed_quote = false;
            }
            QUOTE if field.is_empty() && !closed_quote => in_quotes = true,
            QUOTE => {
                return Err(CodecError::Malformed(
                    "quote inside unquoted field".to_string(),
                ));
            }
            _ if closed_quote => {
                return Err(CodecError::Malformed(format!(
                    "unexpected `{ch}` after closing quote"
                )));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(CodecError::Malformed("unterminated quoted field".to_string()));
    }
    fields.push(field);
    Ok(fields)
}

fn split_tag_list(value: &str) -> CodecResult<Vec<String>> {
    let mut tags = Vec::new();
    let mut tag = String::new();
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some(next) => tag.push(next),
                None => {
                    return Err(CodecError::Malformed(
                        "dangling escape in tag list".to_string(),
                    ))
                }
            },
            TAG_SEPARATOR => tags.push(std::mem::take(&mut tag)),
            _ => tag.push(ch),
        }
    }
    tags.push(tag);
    tags.retain(|tag| !tag.is_empty());
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::{escape_tag, quote, split_fields, split_tag_list};
    use crate::codec::CodecError;

    #[test]
    fn quote_doubles_inner_quotes() {
        assert_eq!(quote(r#"The "Best" Of"#), r#""The ""Best"" Of""#);
    }

    #[test]
    fn split_fields_keeps_separators_inside_quotes() {
        let fields = split_fields(r#""a,b","c""d",2016-01-01,plain"#).unwrap();
        assert_eq!(fields, vec!["a,b", "c\"d", "2016-01-01", "plain"]);
    }

    #[test]
    fn split_fields_rejects_broken_quoting() {
        assert!(matches!(
            split_fields(r#""open,field"#),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            split_fields(r#""closed"tail,x"#),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn quote_escapes_line_breaks_and_backslashes() {
        let quoted = quote("Two\nLines\r\\");
        assert!(!quoted.contains('\n'));
        assert_eq!(split_fields(&quoted).unwrap(), vec!["Two\nLines\r\\"]);
    }

    #[test]
    fn split_fields_rejects_quote_inside_unquoted_field() {
        assert!(matches!(
            split_fields(r#"Lines","A",2016-01-02"#),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            split_fields(r#""bad \q escape""#),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn tag_escapes_survive_split() {
        let joined = [escape_tag("a;b"), escape_tag(r"c\d")].join(";");
        assert_eq!(
            split_tag_list(&joined).unwrap(),
            vec!["a;b".to_string(), r"c\d".to_string()]
        );
        assert!(split_tag_list("").unwrap().is_empty());
    }
}
