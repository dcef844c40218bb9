//! Normalization core: turns raw scraped field tuples into export-ready
//! records.
//!
//! Each submodule owns one concern:
//! - [`date`]: free-form date fragments -> canonical `YYYY.MM.DD.`
//! - [`source`]: three-tier publisher attribution
//! - [`text`]: markup stripping, entity decoding, truncation
//! - [`dedup`]: stable title-based deduplication
//!
//! [`normalize_item`] is the seam the pagination loop calls per item; it
//! rejects unusable listings with a [`SkipReason`] instead of failing.

pub mod date;
pub mod dedup;
pub mod source;
pub mod text;

use crate::models::{NewsRecord, RawItem, SkipReason};
use chrono::NaiveDateTime;

/// Normalize one raw listing into a [`NewsRecord`].
///
/// The title and summary are sanitized, the publisher resolved through the
/// source tiers (which may also strip a publisher suffix from the title),
/// the date coerced to canonical form against `reference`, and the summary
/// capped at `summary_limit` characters. Items with an empty title or link
/// after cleanup are skipped.
pub fn normalize_item(
    item: RawItem,
    reference: NaiveDateTime,
    summary_limit: usize,
) -> Result<NewsRecord, SkipReason> {
    let title = text::sanitize(&item.title);
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }

    let link = item.link.trim().to_string();
    if link.is_empty() {
        return Err(SkipReason::EmptyLink);
    }

    let explicit = item.source.as_deref().map(text::sanitize);
    let (source, title) = source::resolve(explicit.as_deref(), &title, &link);

    let date = date::normalize(item.date.as_deref().unwrap_or(""), reference);

    let summary = item
        .summary
        .as_deref()
        .map(|raw| text::truncate(&text::sanitize(raw), summary_limit))
        .unwrap_or_default();

    Ok(NewsRecord {
        title,
        link,
        source,
        date,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn raw(title: &str, link: &str) -> RawItem {
        RawItem {
            title: title.to_string(),
            link: link.to_string(),
            date: None,
            source: None,
            summary: None,
        }
    }

    #[test]
    fn test_full_normalization() {
        let item = RawItem {
            title: "<b>Big Story</b> - Reuters".to_string(),
            link: " https://reuters.com/x ".to_string(),
            date: Some("3일 전".to_string()),
            source: None,
            summary: Some("<p>A &amp; B   summary</p>".to_string()),
        };
        let record = normalize_item(item, reference(), 200).unwrap();
        assert_eq!(record.title, "Big Story");
        assert_eq!(record.link, "https://reuters.com/x");
        assert_eq!(record.source, "Reuters");
        assert_eq!(record.date, "2024.01.07.");
        assert_eq!(record.summary, "A & B summary");
    }

    #[test]
    fn test_record_invariants_hold() {
        let record = normalize_item(raw("Title", "https://example.com/a"), reference(), 200)
            .expect("usable item");
        assert!(!record.title.is_empty());
        assert!(!record.link.is_empty());
        let canonical = regex::Regex::new(r"^\d{4}\.\d{2}\.\d{2}\.$").unwrap();
        assert!(canonical.is_match(&record.date));
    }

    #[test]
    fn test_empty_title_is_skipped() {
        let result = normalize_item(raw("<br/> \n", "https://example.com"), reference(), 200);
        assert_eq!(result.unwrap_err(), SkipReason::EmptyTitle);
    }

    #[test]
    fn test_empty_link_is_skipped() {
        let result = normalize_item(raw("Title", "   "), reference(), 200);
        assert_eq!(result.unwrap_err(), SkipReason::EmptyLink);
    }

    #[test]
    fn test_explicit_source_preserved_over_title_suffix() {
        let item = RawItem {
            source: Some("연합뉴스".to_string()),
            ..raw("Story - Reuters", "https://reuters.com/x")
        };
        let record = normalize_item(item, reference(), 200).unwrap();
        assert_eq!(record.source, "연합뉴스");
        assert_eq!(record.title, "Story - Reuters");
    }

    #[test]
    fn test_summary_capped() {
        let item = RawItem {
            summary: Some("x".repeat(500)),
            ..raw("Title", "https://example.com")
        };
        let record = normalize_item(item, reference(), 200).unwrap();
        assert_eq!(record.summary.chars().count(), 200);
        assert!(record.summary.ends_with("..."));
    }

    #[test]
    fn test_missing_date_falls_back_to_reference() {
        let record = normalize_item(raw("Title", "https://example.com"), reference(), 200).unwrap();
        assert_eq!(record.date, "2024.01.10.");
    }
}
