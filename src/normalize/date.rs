//! Date normalization for the free-form fragments providers attach to listings.
//!
//! Naver renders relative Korean offsets (`"3일 전"`), Google search results
//! render English ones (`"2 hours ago"`, `"Jan 5, 2023"`), and the RSS feed
//! carries RFC-2822 timestamps. [`normalize`] coerces all of them into the
//! single canonical `YYYY.MM.DD.` form and never fails: anything it cannot
//! read becomes the reference date, so a `date == today` on a record with an
//! unrecognizable raw fragment means "unknown", not "fresh".

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical output layout for every stored date.
pub const CANONICAL_FORMAT: &str = "%Y.%m.%d.";

/// Fixed feed timestamp layouts tried after RFC 2822, in order.
const FEED_LAYOUTS: [&str; 5] = [
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

static FULL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})\.?").unwrap());
static SHORT_YEAR_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{1,2})\.?").unwrap());
static MONTH_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d{1,2})\.(\d{1,2})\.?(?:\s|$)").unwrap());
static FIRST_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());
static NAMED_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]{3,9})\s+(\d{1,2}),\s+(\d{4})").unwrap());

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Convert a raw date fragment into the canonical `YYYY.MM.DD.` string.
///
/// Recognition tiers, first match wins:
/// 1. absolute dot-separated digit groups (`2019.01.04.`, `19.1.4`, `05.17`)
/// 2. relative offsets in Korean (`일 전`, `시간 전`, `분 전`) and English
///    (`hours/days/minutes ago`, `hr`, `min`, `week`, `month` ≈ 30 days)
/// 3. named-month absolute dates (`Jan 5, 2023`)
/// 4. feed timestamps (RFC 2822, then a fixed layout list)
///
/// Anything else, including out-of-range components, yields `reference`
/// formatted canonically.
pub fn normalize(raw: &str, reference: NaiveDateTime) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return reference.format(CANONICAL_FORMAT).to_string();
    }

    if let Some(date) = absolute_date(trimmed, reference) {
        return date;
    }
    if let Some(date) = relative_date(trimmed, reference) {
        return date;
    }
    if let Some(date) = named_month_date(trimmed) {
        return date;
    }
    if let Some(date) = feed_date(trimmed) {
        return date;
    }

    reference.format(CANONICAL_FORMAT).to_string()
}

/// Absolute dot-separated digit groups. A two-digit year is read as 2000s;
/// a bare `MM.DD` borrows the reference year. Matched groups with
/// out-of-range values count as a parse failure, which surfaces as the
/// caller's fallback rather than a different tier.
fn absolute_date(raw: &str, reference: NaiveDateTime) -> Option<String> {
    if let Some(caps) = FULL_DATE_RE.captures(raw) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return emit(year, month, day);
    }
    if let Some(caps) = SHORT_YEAR_DATE_RE.captures(raw) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return emit(2000 + year, month, day);
    }
    if let Some(caps) = MONTH_DAY_RE.captures(raw) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        return emit(reference.date().year(), month, day);
    }
    None
}

/// Relative-offset markers. Detection is substring-based, so a longer phrase
/// containing a shorter unit keyword can misclassify; that imprecision is
/// inherited from the listings themselves and accepted.
fn relative_date(raw: &str, reference: NaiveDateTime) -> Option<String> {
    let offset = if raw.contains("일 전") || raw.contains("일전") {
        Duration::days(first_number(raw)?)
    } else if raw.contains("시간 전") || raw.contains("시간전") {
        Duration::hours(first_number(raw)?)
    } else if raw.contains("분 전") || raw.contains("분전") {
        Duration::minutes(first_number(raw)?)
    } else {
        let lower = raw.to_lowercase();
        if lower.contains("hour") || lower.contains("hr") {
            Duration::hours(first_number(raw)?)
        } else if lower.contains("day") {
            Duration::days(first_number(raw)?)
        } else if lower.contains("min") {
            Duration::minutes(first_number(raw)?)
        } else if lower.contains("week") {
            Duration::weeks(first_number(raw)?)
        } else if lower.contains("month") {
            // month approximated as 30 days
            Duration::days(30 * first_number(raw)?)
        } else {
            return None;
        }
    };

    let target = reference.checked_sub_signed(offset)?;
    Some(target.format(CANONICAL_FORMAT).to_string())
}

fn named_month_date(raw: &str) -> Option<String> {
    let caps = NAMED_MONTH_RE.captures(raw)?;
    let prefix: String = caps[1].to_lowercase().chars().take(3).collect();
    let month = MONTHS.iter().position(|m| *m == prefix)? as u32 + 1;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    emit(year, month, day)
}

fn feed_date(raw: &str) -> Option<String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc().format(CANONICAL_FORMAT).to_string());
    }
    for layout in FEED_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt.format(CANONICAL_FORMAT).to_string());
        }
    }
    None
}

fn first_number(raw: &str) -> Option<i64> {
    FIRST_NUMBER_RE.captures(raw)?[1].parse().ok()
}

fn emit(year: i32, month: u32, day: u32) -> Option<String> {
    // from_ymd_opt rejects out-of-range components
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.format(CANONICAL_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regex::Regex;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_canonical_form_for_all_inputs() {
        let canonical = Regex::new(r"^\d{4}\.\d{2}\.\d{2}\.$").unwrap();
        let inputs = [
            "2019.01.04.",
            "19.1.4",
            "05.17",
            "3일 전",
            "12시간 전",
            "45분 전",
            "2 hours ago",
            "1 week ago",
            "2 months ago",
            "Jan 5, 2023",
            "Mon, 30 May 2025 10:30:00 GMT",
            "2024-01-10T10:30:00Z",
            "",
            "completely unparseable text",
            "13.45.99.",
            "99999 days",
        ];
        for input in inputs {
            let out = normalize(input, reference());
            assert!(canonical.is_match(&out), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn test_deterministic_for_fixed_reference() {
        for input in ["3일 전", "2 hours ago", "garbage"] {
            assert_eq!(normalize(input, reference()), normalize(input, reference()));
        }
    }

    #[test]
    fn test_korean_relative_days() {
        assert_eq!(normalize("3일 전", reference()), "2024.01.07.");
        assert_eq!(normalize("3일전", reference()), "2024.01.07.");
    }

    #[test]
    fn test_korean_relative_hours_and_minutes() {
        assert_eq!(normalize("2시간 전", reference()), "2024.01.10.");
        // 11 hours before 10:00 crosses midnight
        assert_eq!(normalize("11시간 전", reference()), "2024.01.09.");
        assert_eq!(normalize("30분 전", reference()), "2024.01.10.");
    }

    #[test]
    fn test_english_relative_offsets() {
        assert_eq!(normalize("2 hours ago", reference()), "2024.01.10.");
        assert_eq!(normalize("3 days ago", reference()), "2024.01.07.");
        assert_eq!(normalize("5 min ago", reference()), "2024.01.10.");
        assert_eq!(normalize("1 week ago", reference()), "2024.01.03.");
        assert_eq!(normalize("1 month ago", reference()), "2023.12.11.");
        assert_eq!(normalize("4 hrs ago", reference()), "2024.01.10.");
    }

    #[test]
    fn test_absolute_passthrough() {
        assert_eq!(normalize("2019.01.04.", reference()), "2019.01.04.");
        assert_eq!(normalize("입력 2019.1.4. 오후", reference()), "2019.01.04.");
    }

    #[test]
    fn test_two_digit_year_reads_as_2000s() {
        assert_eq!(normalize("19.1.4.", reference()), "2019.01.04.");
    }

    #[test]
    fn test_month_day_short_form_uses_reference_year() {
        assert_eq!(normalize("05.17", reference()), "2024.05.17.");
    }

    #[test]
    fn test_month_day_short_form_requires_word_boundary() {
        // fractional seconds inside an ISO timestamp are not a date
        assert_eq!(
            normalize("2024-01-08T10:30:00.123Z", reference()),
            "2024.01.08."
        );
    }

    #[test]
    fn test_named_month() {
        assert_eq!(normalize("Jan 5, 2023", reference()), "2023.01.05.");
        assert_eq!(normalize("january 5, 2023", reference()), "2023.01.05.");
        assert_eq!(normalize("December 31, 2022", reference()), "2022.12.31.");
    }

    #[test]
    fn test_rfc2822_feed_timestamp() {
        assert_eq!(
            normalize("Mon, 30 May 2025 10:30:00 GMT", reference()),
            "2025.05.30."
        );
    }

    #[test]
    fn test_feed_layout_fallbacks() {
        assert_eq!(normalize("2025-05-30 10:30:00", reference()), "2025.05.30.");
        assert_eq!(
            normalize("2025-05-30T10:30:00Z", reference()),
            "2025.05.30."
        );
    }

    #[test]
    fn test_fallback_to_reference() {
        assert_eq!(normalize("", reference()), "2024.01.10.");
        assert_eq!(normalize("no date here", reference()), "2024.01.10.");
    }

    #[test]
    fn test_out_of_range_components_fall_back() {
        assert_eq!(normalize("2024.13.45.", reference()), "2024.01.10.");
    }

    #[test]
    fn test_unit_marker_without_digits_falls_back() {
        assert_eq!(normalize("hours ago", reference()), "2024.01.10.");
    }
}
