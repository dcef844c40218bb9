//! Excel workbook export.
//!
//! The final result set is written as a single worksheet with one header row
//! and one row per record. The filename embeds the collection start time and
//! the query, e.g. `2024-01-10 14시 03분 22초 반도체.xlsx`, so repeated runs
//! never overwrite each other.
//!
//! The workbook is saved to a dot-prefixed temporary name first and renamed
//! into place, so a crash mid-save never leaves a half-written `.xlsx` at the
//! final path.

use crate::models::NewsRecord;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Timestamp layout used in output filenames.
const FILENAME_TIME_FORMAT: &str = "%Y-%m-%d %H시 %M분 %S초";

#[derive(Debug)]
pub enum ExportError {
    /// Nothing to write; exporting an empty workbook would hide upstream
    /// failures.
    NoRecords,
    Workbook(XlsxError),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoRecords => write!(f, "no records to export"),
            ExportError::Workbook(e) => write!(f, "workbook error: {e}"),
            ExportError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<XlsxError> for ExportError {
    fn from(e: XlsxError) -> Self {
        ExportError::Workbook(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Build the output filename for a run that started at `started`.
pub fn output_filename(query: &str, started: NaiveDateTime) -> String {
    format!("{} {}.xlsx", started.format(FILENAME_TIME_FORMAT), query)
}

/// Write `records` to a new workbook under `output_dir`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`ExportError::NoRecords`] for an empty result set, or the
/// underlying workbook/filesystem error.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub fn write_records(
    records: &[NewsRecord],
    output_dir: &Path,
    query: &str,
    started: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, name) in NewsRecord::COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, record.title.as_str())?;
        worksheet.write_string(row, 1, record.link.as_str())?;
        worksheet.write_string(row, 2, record.source.as_str())?;
        worksheet.write_string(row, 3, record.date.as_str())?;
        worksheet.write_string(row, 4, record.summary.as_str())?;
    }

    let filename = output_filename(query, started);
    let final_path = output_dir.join(&filename);
    let temp_path = output_dir.join(format!(".{filename}"));

    workbook.save(&temp_path)?;
    std::fs::rename(&temp_path, &final_path)?;

    info!(path = %final_path.display(), rows = records.len(), "Wrote workbook");
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str) -> NewsRecord {
        NewsRecord {
            title: title.to_string(),
            link: format!("https://news.example.com/{title}"),
            source: "Press".to_string(),
            date: "2024.01.10.".to_string(),
            summary: "요약".to_string(),
        }
    }

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(14, 3, 22)
            .unwrap()
    }

    fn temp_output_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("newsgrab-xlsx-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_filename_embeds_time_and_query() {
        assert_eq!(
            output_filename("반도체", started()),
            "2024-01-10 14시 03분 22초 반도체.xlsx"
        );
    }

    #[test]
    fn test_write_records_creates_file() {
        let dir = temp_output_dir("write");
        let records = vec![record("a"), record("b")];

        let path = write_records(&records, &dir, "반도체", started()).unwrap();
        assert!(path.is_file());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "2024-01-10 14시 03분 22초 반도체.xlsx"
        );
        // the temp save name must not linger
        assert!(!dir.join(".2024-01-10 14시 03분 22초 반도체.xlsx").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_records_rejects_empty_set() {
        let dir = temp_output_dir("empty");
        let err = write_records(&[], &dir, "q", started()).unwrap_err();
        assert!(matches!(err, ExportError::NoRecords));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
