//! Naver News search-page adapter.
//!
//! Naver paginates search results ten listings at a time through the
//! `start` parameter (`start=1, 11, 21, ...`). Listings live in
//! `div.news_area` blocks (older markup: `li.bx`); each block carries the
//! headline anchor, a press label, a relative or absolute date fragment, and
//! a snippet.

use crate::fetch::{FetchError, Fetcher};
use crate::models::RawItem;
use crate::scrapers::Provider;
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

const SEARCH_BASE_URL: &str = "https://search.naver.com/search.naver";

const PAGE_SIZE: usize = 10;

const SUMMARY_LIMIT: usize = 200;

/// Result ordering, mapped to Naver's numeric `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Relevance,
    Recent,
    Oldest,
}

impl SortOrder {
    fn param(self) -> &'static str {
        match self {
            SortOrder::Relevance => "0",
            SortOrder::Recent => "1",
            SortOrder::Oldest => "2",
        }
    }
}

/// Provider adapter for Naver News search pages.
pub struct NaverSearch {
    fetcher: Fetcher,
    sort: SortOrder,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl NaverSearch {
    pub fn new(
        fetcher: Fetcher,
        sort: SortOrder,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            sort,
            start_date,
            end_date,
        }
    }

    fn search_url(&self, query: &str, page: usize) -> String {
        let start = (page - 1) * PAGE_SIZE + 1;
        let mut url = format!(
            "{SEARCH_BASE_URL}?where=news&query={}&sort={}&start={start}",
            urlencoding::encode(query),
            self.sort.param()
        );
        if let (Some(ds), Some(de)) = (&self.start_date, &self.end_date) {
            // pd=3 selects the custom date-window mode
            url.push_str(&format!("&pd=3&ds={ds}&de={de}"));
        }
        url
    }
}

impl Provider for NaverSearch {
    fn name(&self) -> &'static str {
        "naver"
    }

    fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    fn summary_limit(&self) -> usize {
        SUMMARY_LIMIT
    }

    #[instrument(level = "info", skip(self, query))]
    async fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<RawItem>, FetchError> {
        let url = self.search_url(query, page);
        debug!(%url, "fetching Naver search page");
        let html = self.fetcher.get_text(&url).await?;

        let items = parse_page(&html);
        if items.is_empty() {
            debug!(
                body_preview = %truncate_for_log(&html, 300),
                "no news items matched selectors"
            );
        }
        info!(page, count = items.len(), "parsed Naver listings");
        Ok(items)
    }
}

/// Extract raw field tuples from one Naver search-results page.
///
/// Listings without a headline anchor (or with an anchor missing its href)
/// are skipped; their siblings continue.
pub fn parse_page(html: &str) -> Vec<RawItem> {
    let document = Html::parse_document(html);
    let area_selector = Selector::parse("div.news_area").unwrap();
    let legacy_selector = Selector::parse("li.bx").unwrap();

    let mut blocks: Vec<ElementRef> = document.select(&area_selector).collect();
    if blocks.is_empty() {
        blocks = document.select(&legacy_selector).collect();
    }

    blocks.iter().filter_map(|block| extract_item(*block)).collect()
}

fn extract_item(block: ElementRef) -> Option<RawItem> {
    let title_selector = Selector::parse("a.news_tit").unwrap();
    let legacy_title_selector = Selector::parse("a.api_txt_lines").unwrap();

    let anchor = block
        .select(&title_selector)
        .next()
        .or_else(|| block.select(&legacy_title_selector).next())?;

    let title = element_text(anchor);
    let link = anchor.value().attr("href")?.to_string();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let source = first_text(block, &[".info_group .press", ".press", ".cp"]);
    let date = first_text(block, &[".info_group span.info", "span.info", ".date"]);
    let summary = first_text(block, &[".news_dsc", ".dsc_wrap", ".api_txt_lines.dsc_txt"]);

    Some(RawItem {
        title,
        link,
        date,
        source,
        summary,
    })
}

/// Text of the first element matching any of `selectors`, in order.
fn first_text(block: ElementRef, selectors: &[&str]) -> Option<String> {
    for css in selectors {
        let selector = Selector::parse(css).unwrap();
        if let Some(element) = block.select(&selector).next() {
            let text = element_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Fetcher, HeaderProfile, RetryPolicy};

    const SAMPLE_PAGE: &str = r#"<html><body>
<div class="group_news"><ul class="list_news">
  <li class="bx">
    <div class="news_area">
      <div class="info_group">
        <a class="press">연합뉴스</a>
        <span class="info">3일 전</span>
      </div>
      <a class="news_tit" href="https://news.example.com/a1">수소차 보급 확대</a>
      <div class="news_dsc">정부가 <b>수소차</b> 보급을 확대한다   고 밝혔다</div>
    </div>
  </li>
  <li class="bx">
    <div class="news_area">
      <a class="news_tit" href="https://news.example.com/a2">두번째 기사</a>
    </div>
  </li>
  <li class="bx">
    <div class="news_area">
      <span>no anchor here</span>
    </div>
  </li>
</ul></div>
</body></html>"#;

    #[test]
    fn test_parse_page_extracts_listings() {
        let items = parse_page(SAMPLE_PAGE);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "수소차 보급 확대");
        assert_eq!(items[0].link, "https://news.example.com/a1");
        assert_eq!(items[0].source.as_deref(), Some("연합뉴스"));
        assert_eq!(items[0].date.as_deref(), Some("3일 전"));
        assert!(items[0].summary.as_deref().unwrap().contains("보급"));
    }

    #[test]
    fn test_listing_without_anchor_is_skipped() {
        let items = parse_page(SAMPLE_PAGE);
        assert!(items.iter().all(|item| !item.link.is_empty()));
    }

    #[test]
    fn test_missing_optional_fields_stay_none() {
        let items = parse_page(SAMPLE_PAGE);
        assert!(items[1].source.is_none());
        assert!(items[1].date.is_none());
        assert!(items[1].summary.is_none());
    }

    #[test]
    fn test_parse_page_on_empty_document() {
        assert!(parse_page("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_search_url_pagination_and_window() {
        let naver = NaverSearch::new(
            Fetcher::new(HeaderProfile::Browser, RetryPolicy::default()).unwrap(),
            SortOrder::Recent,
            Some("2019.01.04".to_string()),
            Some("2019.01.05".to_string()),
        );
        let url = naver.search_url("수소차", 3);
        assert!(url.contains("start=21"));
        assert!(url.contains("sort=1"));
        assert!(url.contains("pd=3"));
        assert!(url.contains("ds=2019.01.04"));
    }

    #[test]
    fn test_search_url_first_page() {
        let naver = NaverSearch::new(
            Fetcher::new(HeaderProfile::Browser, RetryPolicy::default()).unwrap(),
            SortOrder::Relevance,
            None,
            None,
        );
        let url = naver.search_url("query", 1);
        assert!(url.contains("start=1"));
        assert!(!url.contains("pd=3"));
    }
}
