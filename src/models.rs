//! Data models for scraped news listings.
//!
//! Two representations flow through the pipeline:
//! - [`RawItem`]: one unprocessed (title, link, date, source, summary) tuple
//!   as extracted from a search page or feed, before any cleanup
//! - [`NewsRecord`]: the normalized, export-ready row
//!
//! Items that cannot become a valid record are rejected with a [`SkipReason`]
//! rather than raised as errors, so one malformed listing never takes down
//! the page it arrived on.

use serde::Serialize;
use std::fmt;

/// A raw field tuple scraped from one article listing.
///
/// Every field except `title` and `link` is optional because providers
/// render listings inconsistently; missing fields are filled in (or left
/// empty) during normalization.
#[derive(Debug, Clone)]
pub struct RawItem {
    /// Listing headline, possibly containing markup and a trailing
    /// `" - Publisher"` suffix.
    pub title: String,
    /// Article URL. May still be a provider redirect URL at this stage.
    pub link: String,
    /// Free-form date fragment (`"3일 전"`, `"2 hours ago"`,
    /// `"Mon, 30 May 2025 10:30:00 GMT"`, ...).
    pub date: Option<String>,
    /// Publisher name when the provider renders one explicitly.
    pub source: Option<String>,
    /// Listing snippet/description, possibly containing markup.
    pub summary: Option<String>,
}

/// A fully normalized article record, the unit of spreadsheet output.
///
/// # Invariants
///
/// - `title` and `link` are non-empty
/// - `date` always matches `YYYY.MM.DD.`
/// - `summary` is sanitized and length-capped (possibly empty)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: String,
    pub summary: String,
}

impl NewsRecord {
    /// Column order used by the spreadsheet export.
    pub const COLUMNS: [&'static str; 5] = ["title", "link", "source", "date", "summary"];
}

/// Why a raw item was dropped instead of becoming a [`NewsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Title was empty after sanitization.
    EmptyTitle,
    /// Link was empty after trimming.
    EmptyLink,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyTitle => write!(f, "empty title after sanitization"),
            SkipReason::EmptyLink => write!(f, "empty link"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_construction() {
        let item = RawItem {
            title: "Headline".to_string(),
            link: "https://example.com/a".to_string(),
            date: Some("3일 전".to_string()),
            source: None,
            summary: None,
        };
        assert_eq!(item.title, "Headline");
        assert!(item.source.is_none());
    }

    #[test]
    fn test_column_order() {
        assert_eq!(
            NewsRecord::COLUMNS,
            ["title", "link", "source", "date", "summary"]
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::EmptyLink.to_string(), "empty link");
        assert!(SkipReason::EmptyTitle.to_string().contains("title"));
    }
}
