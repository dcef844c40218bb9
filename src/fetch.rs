//! HTTP fetching with header profiles and exponential-backoff retry.
//!
//! Both providers go through one [`Fetcher`]: a reqwest client carrying a
//! browser-like (or feed-like) header profile, wrapped in a bounded retry
//! loop so transient failures are absorbed locally and never surface as
//! fatal errors to the pagination loop.
//!
//! # Retry strategy
//!
//! - up to 5 attempts per request
//! - exponential backoff starting at 2 seconds, capped at 30 seconds
//! - random jitter (0-250 ms) added to each delay
//! - HTTP 429/500/502/503/504 are retried; other non-2xx statuses fail fast

use rand::{Rng, rng};
use reqwest::header::{HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Statuses worth retrying: rate limiting and transient server failures.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// A transport-level failure, after retries are exhausted.
#[derive(Debug)]
pub enum FetchError {
    ConnectionFailed(String),
    Timeout(String),
    HttpStatus(u16),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::ConnectionFailed(msg) => write!(f, "connection failed: {msg}"),
            FetchError::Timeout(msg) => write!(f, "request timed out: {msg}"),
            FetchError::HttpStatus(code) => write!(f, "unexpected HTTP status {code}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    fn retryable(&self) -> bool {
        match self {
            FetchError::ConnectionFailed(_) | FetchError::Timeout(_) => true,
            FetchError::HttpStatus(code) => RETRYABLE_STATUSES.contains(code),
        }
    }
}

/// Bounded exponential-backoff schedule.
///
/// `delay = min(base * 2^(attempt-1), max)` plus 0-250 ms of jitter. The
/// schedule is separated from the fetch loop so failure handling can be
/// tested without real delays.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `attempt` (1-based), without jitter.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << exp);
        delay.min(self.max_delay)
    }

    fn jittered_delay_for(&self, attempt: usize) -> Duration {
        let jitter_ms: u64 = rng().random_range(0..=250);
        self.delay_for(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Which header profile a fetcher presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Full browser-like headers for HTML search pages.
    Browser,
    /// Feed-reader headers (`application/rss+xml` accept, no-cache) for RSS.
    Feed,
}

impl HeaderProfile {
    fn headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Accept-Language", HeaderValue::from_static(ACCEPT_LANGUAGE));
        match self {
            HeaderProfile::Browser => {
                headers.insert(
                    "Accept",
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
                    ),
                );
                headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
            }
            HeaderProfile::Feed => {
                headers.insert(
                    "Accept",
                    HeaderValue::from_static("application/rss+xml, application/xml, text/xml, */*"),
                );
                headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
                headers.insert("Pragma", HeaderValue::from_static("no-cache"));
            }
        }
        headers
    }
}

/// HTTP client with a fixed header profile and retry policy.
pub struct Fetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(profile: HeaderProfile, policy: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(profile.headers())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, policy })
    }

    /// GET `url` and return the response body as text, retrying transient
    /// failures per the policy. Exhausted retries return the last error.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0usize;
        loop {
            match self.try_get_text(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if !e.retryable() || attempt >= self.policy.max_retries {
                        warn!(%url, attempt, error = %e, "fetch failed");
                        return Err(e);
                    }
                    let delay = self.policy.jittered_delay_for(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.policy.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn try_get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(classify_reqwest_error)
    }

    /// Follow redirects on `url` and report the final location. Used for
    /// unwrapping provider tracking links; best-effort, so failures collapse
    /// to `None` and the caller keeps the original URL.
    pub async fn final_url(&self, url: &str) -> Option<String> {
        match self.client.head(url).send().await {
            Ok(response) => {
                let resolved = response.url().to_string();
                debug!(%url, %resolved, "resolved redirect");
                Some(resolved)
            }
            Err(e) => {
                debug!(%url, error = %e, "redirect resolution failed");
                None
            }
        }
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else if let Some(status) = e.status() {
        FetchError::HttpStatus(status.as_u16())
    } else {
        FetchError::ConnectionFailed(e.to_string())
    }
}
