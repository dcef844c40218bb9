//! Provider adapters for turning one page of remote markup into raw field
//! tuples.
//!
//! Each adapter implements the same [`Provider`] contract so the pagination
//! loop in [`crate::session`] does not care where listings come from:
//!
//! | Provider | Module | Transport | Page shape |
//! |----------|--------|-----------|------------|
//! | Google News | [`google`] | RSS feed (quick-xml) | single feed, up to ~100 items |
//! | Naver News | [`naver`] | search HTML (scraper) | 10 listings per page |
//!
//! New providers are added as new modules implementing [`Provider`], not as
//! copies of the crawl loop.

pub mod google;
pub mod naver;

use crate::fetch::FetchError;
use crate::models::RawItem;

/// One news provider's page-fetching contract.
///
/// `fetch_page` performs the network round trip and extraction for page
/// `page` (1-based) and returns unnormalized field tuples; malformed listings
/// are skipped inside the adapter, transport failures bubble up as
/// [`FetchError`] for the session to handle.
pub trait Provider {
    /// Short lowercase identifier used in logs.
    fn name(&self) -> &'static str;

    /// Nominal number of listings on a full page; fewer signals the last
    /// page.
    fn page_size(&self) -> usize;

    /// Character cap applied to listing summaries.
    fn summary_limit(&self) -> usize {
        200
    }

    async fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<RawItem>, FetchError>;
}
