//! Shared rendering utilities.
//!
//! Date display for article cards and fuzzy-match highlight ranges for searched titles.
//!
//! # Features
//!
//! - **Date precedence**: picks the first usable timestamp in a view-specific order
//! - **Lenient parsing**: RFC 3339, naive ISO and plain dates are all accepted
//! - **UTF-8 safe highlighting**: ranges are character indices, not byte indices
//!
//! # Example
//!
//! ```
//! use codenexus::ui::helpers::{format_date, highlight_ranges};
//!
//! assert_eq!(format_date(Some("2024-03-05T10:00:00Z")), "2024/3/5");
//! assert_eq!(format_date(None), "未知日期");
//! assert_eq!(highlight_ranges("async rust", "rust"), vec![(6, 10)]);
//! ```

use crate::domain::Article;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Placeholder for a missing or unparseable date.
pub const UNKNOWN_DATE: &str = "未知日期";

/// Placeholder for a blank article source.
pub const UNKNOWN_SOURCE: &str = "未知来源";

/// Parses a backend timestamp into its calendar date.
///
/// The date is taken as written in the timestamp; no timezone conversion is applied.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Formats a timestamp as `YYYY/M/D`, or [`UNKNOWN_DATE`].
#[must_use]
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date).map_or_else(
        || UNKNOWN_DATE.to_string(),
        |date| format!("{}/{}/{}", date.year(), date.month(), date.day()),
    )
}

/// First non-blank value among `candidates`.
fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.trim().is_empty())
}

/// Display date for listing cards: archived, then published, then created.
#[must_use]
pub fn listing_date(article: &Article) -> String {
    format_date(first_present(&[&article.archived_at, &article.published_time, &article.created_at]))
}

/// Display date for related-article cards: published, then created, then archived.
#[must_use]
pub fn related_date(article: &Article) -> String {
    format_date(first_present(&[&article.published_time, &article.created_at, &article.archived_at]))
}

/// Source name, or [`UNKNOWN_SOURCE`] when blank.
#[must_use]
pub fn source_name(article: &Article) -> String {
    article
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_SOURCE)
        .to_string()
}

/// Feed label of an article: `AI资讯` or `编程资讯`.
#[must_use]
pub fn feed_label(article: &Article) -> &'static str {
    if article.is_ai_news() {
        "AI资讯"
    } else {
        "编程资讯"
    }
}

/// Computes character index ranges to highlight for a fuzzy match of `query` in `text`.
///
/// # Returns
///
/// `(start, end)` character ranges with exclusive end, one per contiguous run of matched
/// characters. Empty when the query is blank or does not match.
///
/// # Algorithm
///
/// 1. Get fuzzy match indices from the Skim matcher
/// 2. Walk the indices, extending the current run while they are consecutive
/// 3. Emit a range at every gap and at the end
#[must_use]
pub fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() {
        return vec![];
    }

    let matcher = SkimMatcherV2::default();
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    for idx in indices {
        run = match run {
            None => Some((idx, idx)),
            Some((start, prev)) if idx == prev + 1 => Some((start, idx)),
            Some((start, prev)) => {
                ranges.push((start, prev + 1));
                Some((idx, idx))
            }
        };
    }

    if let Some((start, prev)) = run {
        ranges.push((start, prev + 1));
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_backend_timestamp_shapes() {
        assert_eq!(format_date(Some("2024-03-05T23:30:00+08:00")), "2024/3/5");
        assert_eq!(format_date(Some("2024-11-20T08:01:02.123456")), "2024/11/20");
        assert_eq!(format_date(Some("2024-01-09 12:00:00")), "2024/1/9");
        assert_eq!(format_date(Some("2024-12-31")), "2024/12/31");
        assert_eq!(format_date(Some("last tuesday")), UNKNOWN_DATE);
        assert_eq!(format_date(Some("")), UNKNOWN_DATE);
    }

    #[test]
    fn date_precedence_differs_by_view() {
        let article = Article {
            archived_at: Some("2024-01-03".into()),
            published_time: Some("2024-01-02".into()),
            created_at: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert_eq!(listing_date(&article), "2024/1/3");
        assert_eq!(related_date(&article), "2024/1/2");

        let created_only = Article { archived_at: Some("  ".into()), created_at: Some("2024-05-06".into()), ..Default::default() };
        assert_eq!(listing_date(&created_only), "2024/5/6");
        assert_eq!(listing_date(&Article::default()), UNKNOWN_DATE);
    }

    #[test]
    fn blank_source_falls_back() {
        let article = Article { source: Some("   ".into()), ..Default::default() };
        assert_eq!(source_name(&article), UNKNOWN_SOURCE);
        let article = Article { source: Some("InfoQ".into()), ..Default::default() };
        assert_eq!(source_name(&article), "InfoQ");
    }

    #[test]
    fn highlight_ranges_coalesce_runs() {
        assert_eq!(highlight_ranges("my-project", "mypr"), vec![(0, 2), (3, 5)]);
        assert!(highlight_ranges("rust", "").is_empty());
        assert!(highlight_ranges("rust", "zzz").is_empty());
    }

    #[test]
    fn highlight_ranges_use_char_indices() {
        let ranges = highlight_ranges("用 Rust 写服务", "Rust");
        assert_eq!(ranges, vec![(2, 6)]);
    }
}
