//! Title-based deduplication of crawl results.

use crate::models::NewsRecord;
use itertools::Itertools;

/// Remove repeat articles, keeping the first occurrence of each sanitized
/// title and preserving relative order. Titles have already been
/// whitespace-normalized by sanitization, so the key is an exact,
/// case-sensitive match.
pub fn by_title(records: Vec<NewsRecord>) -> Vec<NewsRecord> {
    records
        .into_iter()
        .unique_by(|record| record.title.clone())
        .collect()
}
