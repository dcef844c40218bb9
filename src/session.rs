//! Crawl session: the pagination loop around one provider.
//!
//! A session owns its accumulator for the duration of one query run. Pages
//! are fetched in order until one of the stopping conditions holds:
//!
//! - the configured page cap is reached
//! - a page yields zero usable items
//! - a page yields fewer raw items than the provider's nominal page size
//!   (a short page signals the last page)
//!
//! Transport failures stop pagination but never abort the run; whatever was
//! accumulated is still finalized, since partial results are valuable. A
//! jittered delay runs before every request after the first, to stay a
//! polite client of the remote service.

use crate::models::NewsRecord;
use crate::normalize::{dedup, normalize_item};
use crate::scrapers::Provider;
use chrono::Local;
use rand::{Rng, rng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Tuning knobs for one crawl session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound on pages fetched.
    pub max_pages: usize,
    /// Inclusive jitter range in seconds for the inter-page delay; `None`
    /// disables the delay (tests).
    pub page_delay: Option<(f64, f64)>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_pages: 5,
            page_delay: Some((1.5, 3.0)),
        }
    }
}

/// Single-provider pagination driver.
pub struct CrawlSession<P> {
    provider: P,
    options: SessionOptions,
}

impl<P: Provider> CrawlSession<P> {
    pub fn new(provider: P, options: SessionOptions) -> Self {
        Self { provider, options }
    }

    /// Run the session to completion and return the deduplicated result set.
    pub async fn run(&self, query: &str) -> Vec<NewsRecord> {
        let mut records: Vec<NewsRecord> = Vec::new();

        for page in 1..=self.options.max_pages {
            if page > 1 {
                self.pause().await;
            }

            let raw_items = match self.provider.fetch_page(query, page).await {
                Ok(items) => items,
                Err(e) => {
                    // transport failure: treat the page as empty and stop
                    warn!(
                        provider = self.provider.name(),
                        page,
                        error = %e,
                        "page fetch failed; stopping pagination"
                    );
                    break;
                }
            };

            let raw_count = raw_items.len();
            if raw_count == 0 {
                info!(provider = self.provider.name(), page, "empty page; stopping");
                break;
            }

            let reference = Local::now().naive_local();
            let mut usable = 0usize;
            for item in raw_items {
                match normalize_item(item, reference, self.provider.summary_limit()) {
                    Ok(record) => {
                        records.push(record);
                        usable += 1;
                    }
                    Err(reason) => {
                        debug!(provider = self.provider.name(), page, %reason, "skipping item");
                    }
                }
            }

            info!(
                provider = self.provider.name(),
                page,
                raw = raw_count,
                usable,
                total = records.len(),
                "page processed"
            );

            if usable == 0 {
                info!(
                    provider = self.provider.name(),
                    page, "no usable items on page; stopping"
                );
                break;
            }
            if raw_count < self.provider.page_size() {
                info!(
                    provider = self.provider.name(),
                    page,
                    raw = raw_count,
                    nominal = self.provider.page_size(),
                    "short page; stopping"
                );
                break;
            }
        }

        dedup::by_title(records)
    }

    async fn pause(&self) {
        if let Some((low, high)) = self.options.page_delay {
            let secs = rng().random_range(low..=high);
            sleep(Duration::from_secs_f64(secs)).await;
        }
    }
}
