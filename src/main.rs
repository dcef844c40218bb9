//! # newsgrab
//!
//! A news-metadata crawler that collects article listings for a search query
//! from the Google News RSS feed and Naver news search, normalizes the noisy
//! listing fields into a uniform shape, and writes the deduplicated result set
//! to a timestamped Excel workbook.
//!
//! ## Usage
//!
//! ```sh
//! newsgrab "반도체 수출"
//! newsgrab "수소차" --provider naver --sort recent --max-pages 10
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetch**: Download listing pages per provider with retry/backoff
//! 2. **Parse**: Extract raw items from RSS XML or search-result HTML
//! 3. **Normalize**: Canonicalize dates, resolve sources, sanitize text
//! 4. **Export**: Deduplicate by title and write one `.xlsx` workbook

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod scrapers;
mod session;
mod utils;

use cli::{Cli, ProviderKind};
use fetch::{Fetcher, HeaderProfile, RetryPolicy};
use models::NewsRecord;
use scrapers::google::GoogleFeed;
use scrapers::naver::NaverSearch;
use session::{CrawlSession, SessionOptions};
use utils::ensure_writable_dir;

const MAX_PAGES_CEILING: usize = 20;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let started = Local::now().naive_local();
    info!("newsgrab starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable before any network work
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let max_pages = args.max_pages.clamp(1, MAX_PAGES_CEILING);
    if max_pages != args.max_pages {
        warn!(
            requested = args.max_pages,
            effective = max_pages,
            "max-pages out of range; clamped"
        );
    }
    let options = SessionOptions {
        max_pages,
        ..SessionOptions::default()
    };

    let mut all_records: Vec<NewsRecord> = Vec::new();

    if matches!(args.provider, ProviderKind::Google | ProviderKind::All) {
        let fetcher = Fetcher::new(HeaderProfile::Feed, RetryPolicy::default())?;
        let provider = GoogleFeed::new(
            fetcher,
            args.language,
            args.time_range,
            args.resolve_redirects,
        );
        let session = CrawlSession::new(provider, options.clone());
        let records = session.run(&args.query).await;
        info!(provider = "google", count = records.len(), "Provider run complete");
        all_records.extend(records);
    }

    if matches!(args.provider, ProviderKind::Naver | ProviderKind::All) {
        let fetcher = Fetcher::new(HeaderProfile::Browser, RetryPolicy::default())?;
        let provider = NaverSearch::new(
            fetcher,
            args.sort,
            args.start_date.clone(),
            args.end_date.clone(),
        );
        let session = CrawlSession::new(provider, options.clone());
        let records = session.run(&args.query).await;
        info!(provider = "naver", count = records.len(), "Provider run complete");
        all_records.extend(records);
    }

    // Cross-provider dedup; each session already deduplicated its own set
    let records = normalize::dedup::by_title(all_records);
    if records.is_empty() {
        error!(query = %args.query, "No usable records collected from any provider");
        return Err("no usable records collected".into());
    }

    let path = outputs::xlsx::write_records(&records, Path::new(&args.output_dir), &args.query, started)?;

    let elapsed = start_time.elapsed();
    info!(
        count = records.len(),
        path = %path.display(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
