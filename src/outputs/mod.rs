//! Output generation for collected news records.
//!
//! # Submodules
//!
//! - [`xlsx`]: Writes the final result set to a timestamped Excel workbook
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2024-01-10 14시 03분 22초 반도체.xlsx
//! ```

pub mod xlsx;
