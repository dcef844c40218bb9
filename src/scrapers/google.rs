//! Google News RSS adapter.
//!
//! Google News exposes search results as an RSS 2.0 feed at
//! `https://news.google.com/rss/search`. The feed is a single page of up to
//! roughly a hundred `<item>` entries, so this adapter reports everything on
//! page 1 and an empty page afterwards, letting the session's stopping rules
//! do the rest.
//!
//! Feed links are frequently redirect URLs (`google.com/url?q=...` or
//! `news.google.com/rss/articles/...`); the query-parameter form is unwrapped
//! locally, and the tracking-article form can optionally be resolved over the
//! network when the caller opts in.

use crate::fetch::{FetchError, Fetcher};
use crate::models::RawItem;
use crate::normalize::date;
use crate::scrapers::Provider;
use chrono::{Duration, Local, NaiveDate};
use clap::ValueEnum;
use futures::stream::{self, StreamExt};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument, warn};
use url::Url;

const FEED_BASE_URL: &str = "https://news.google.com/rss/search";

/// The feed does not paginate; one fetch returns up to this many items.
const FEED_PAGE_SIZE: usize = 100;

const SUMMARY_LIMIT: usize = 300;

/// Feed locale selection, mapped to the `hl`/`gl`/`ceid` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn feed_params(self) -> &'static str {
        match self {
            Language::Ko => "hl=ko&gl=KR&ceid=KR:ko",
            Language::En => "hl=en&gl=US&ceid=US:en",
        }
    }
}

/// Search window, appended to the query as a `when:` operator and also used
/// as a post-parse cutoff since the feed does not filter reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
}

impl TimeRange {
    fn query_operator(self) -> &'static str {
        match self {
            TimeRange::Hour => "when:1h",
            TimeRange::Day => "when:1d",
            TimeRange::Week => "when:1w",
            TimeRange::Month => "when:1m",
        }
    }

    /// Cutoff in days for post-parse filtering; sub-day windows are left to
    /// the `when:` operator alone.
    fn cutoff_days(self) -> Option<i64> {
        match self {
            TimeRange::Hour => None,
            TimeRange::Day => Some(1),
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
        }
    }
}

/// Provider adapter for the Google News search feed.
pub struct GoogleFeed {
    fetcher: Fetcher,
    language: Language,
    time_range: TimeRange,
    resolve_redirects: bool,
}

impl GoogleFeed {
    pub fn new(
        fetcher: Fetcher,
        language: Language,
        time_range: TimeRange,
        resolve_redirects: bool,
    ) -> Self {
        Self {
            fetcher,
            language,
            time_range,
            resolve_redirects,
        }
    }

    fn feed_url(&self, query: &str) -> String {
        let full_query = format!("{query} {}", self.time_range.query_operator());
        format!(
            "{FEED_BASE_URL}?q={}&{}",
            urlencoding::encode(&full_query),
            self.language.feed_params()
        )
    }

    /// Drop items whose publication date falls outside the search window.
    /// Items without a parseable date are kept.
    fn apply_cutoff(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        let Some(days) = self.time_range.cutoff_days() else {
            return items;
        };
        let now = Local::now().naive_local();
        let cutoff = now.date() - Duration::days(days);

        items
            .into_iter()
            .filter(|item| match item.date.as_deref() {
                Some(raw) => {
                    let canonical = date::normalize(raw, now);
                    match NaiveDate::parse_from_str(&canonical, date::CANONICAL_FORMAT) {
                        Ok(item_date) => item_date >= cutoff,
                        Err(_) => true,
                    }
                }
                None => true,
            })
            .collect()
    }

    /// Resolve `news.google.com` tracking links to their final article URLs,
    /// one at a time. Failures keep the tracking URL; partial metadata beats
    /// a dropped item.
    async fn resolve_links(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        stream::iter(items)
            .then(|mut item| async move {
                if is_tracking_link(&item.link) {
                    if let Some(resolved) = self.fetcher.final_url(&item.link).await {
                        item.link = resolved;
                    }
                }
                item
            })
            .collect()
            .await
    }
}

impl Provider for GoogleFeed {
    fn name(&self) -> &'static str {
        "google"
    }

    fn page_size(&self) -> usize {
        FEED_PAGE_SIZE
    }

    fn summary_limit(&self) -> usize {
        SUMMARY_LIMIT
    }

    #[instrument(level = "info", skip(self, query))]
    async fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<RawItem>, FetchError> {
        // single feed; everything arrives on page 1
        if page > 1 {
            return Ok(Vec::new());
        }

        let url = self.feed_url(query);
        debug!(%url, "fetching Google News feed");
        let body = self.fetcher.get_text(&url).await?;

        let mut items = parse_feed(&body);
        info!(count = items.len(), "parsed feed items");

        for item in &mut items {
            item.link = unwrap_redirect(&item.link);
        }
        items = self.apply_cutoff(items);

        if self.resolve_redirects {
            items = self.resolve_links(items).await;
        }

        Ok(items)
    }
}

/// Parse an RSS 2.0 feed into raw field tuples.
///
/// Items missing a title or link are dropped here; everything else is left
/// raw for normalization. Titles commonly arrive as CDATA and carry a
/// `" - Publisher"` suffix, which the source resolver strips later.
pub fn parse_feed(xml: &str) -> Vec<RawItem> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut cur_text = String::new();

    let mut title = String::new();
    let mut link = String::new();
    let mut pub_date: Option<String> = None;
    let mut source: Option<String> = None;
    let mut description: Option<String> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    pub_date = None;
                    source = None;
                    description = None;
                }
                cur_text.clear();
            }
            Ok(Event::End(e)) => {
                if !in_item {
                    cur_text.clear();
                    continue;
                }
                match e.name().as_ref() {
                    b"item" => {
                        in_item = false;
                        if title.trim().is_empty() || link.trim().is_empty() {
                            warn!("feed item missing title or link; skipping");
                        } else {
                            items.push(RawItem {
                                title: title.trim().to_string(),
                                link: link.trim().to_string(),
                                date: pub_date.take(),
                                source: source.take(),
                                summary: description.take(),
                            });
                        }
                    }
                    b"title" => title = cur_text.clone(),
                    b"link" => link = cur_text.clone(),
                    b"pubDate" => pub_date = Some(cur_text.clone()),
                    b"source" => source = Some(cur_text.clone()),
                    b"description" => description = Some(cur_text.clone()),
                    _ => {}
                }
                cur_text.clear();
            }
            Ok(Event::Text(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::CData(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "feed parse error; keeping items collected so far");
                break;
            }
        }
        buf.clear();
    }

    items
}

/// Unwrap `google.com/url?q=...`-style redirect wrappers at string level.
/// Already-decoded by the URL parser's query handling; no network involved.
pub fn unwrap_redirect(link: &str) -> String {
    if let Ok(url) = Url::parse(link) {
        let is_google = url
            .host_str()
            .is_some_and(|host| host == "google.com" || host.ends_with(".google.com"));
        if is_google {
            for (key, value) in url.query_pairs() {
                if key == "url" || key == "q" {
                    return value.into_owned();
                }
            }
        }
    }
    link.to_string()
}

/// True for `news.google.com` article-tracking links that only resolve to
/// the real publisher URL via a redirect.
fn is_tracking_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| {
        url.host_str() == Some("news.google.com") && url.path().contains("/articles/")
    })
}
