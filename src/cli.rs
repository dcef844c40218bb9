//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use crate::scrapers::google::{Language, TimeRange};
use crate::scrapers::naver::SortOrder;
use clap::{Parser, ValueEnum};

/// Which providers to crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Google,
    Naver,
    All,
}

/// Command-line arguments for the newsgrab crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl both providers for a query
/// newsgrab "반도체 수출"
///
/// # Naver only, newest first, more pages
/// newsgrab "반도체 수출" --provider naver --sort recent --max-pages 10
///
/// # Google feed in English, last week, resolving redirect links
/// newsgrab "semiconductors" --provider google --language en \
///     --time-range week --resolve-redirects
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search query
    pub query: String,

    /// Which news providers to crawl
    #[arg(long, value_enum, default_value = "all")]
    pub provider: ProviderKind,

    /// Maximum result pages to fetch per provider (clamped to 1..=20)
    #[arg(long, default_value_t = 5)]
    pub max_pages: usize,

    /// Result ordering for the Naver provider
    #[arg(long, value_enum, default_value = "relevance")]
    pub sort: SortOrder,

    /// Recency window for the Google feed
    #[arg(long, value_enum, default_value = "day")]
    pub time_range: TimeRange,

    /// Feed language/region for the Google feed
    #[arg(long, value_enum, default_value = "ko")]
    pub language: Language,

    /// Custom window start for Naver, `YYYY.MM.DD` (requires --end-date)
    #[arg(long, requires = "end_date")]
    pub start_date: Option<String>,

    /// Custom window end for Naver, `YYYY.MM.DD` (requires --start-date)
    #[arg(long, requires = "start_date")]
    pub end_date: Option<String>,

    /// Output directory for the Excel workbook
    #[arg(short, long, default_value = "./result")]
    pub output_dir: String,

    /// Resolve Google redirect links to publisher URLs (one extra request per item)
    #[arg(long, default_value_t = false)]
    pub resolve_redirects: bool,
}
