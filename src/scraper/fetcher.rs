//! HTTP fetcher for single listing pages
//!
//! This module handles all HTTP traffic for the scraper, including:
//! - Building the HTTP client with the portal's static headers
//! - Overlaying the page number onto the configured filter parameters
//! - Decoding page payloads
//! - Classifying failures into values the scheduler can keep working past

use crate::config::Config;
use crate::state::Item;
use crate::TenderError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Result of fetching one page
///
/// Failures are ordinary values rather than errors so a bad page never
/// unwinds past the task that fetched it.
#[derive(Debug)]
pub enum PageResult {
    /// The page was retrieved and decoded
    Success {
        /// 1-based page number this payload belongs to
        page_number: u32,
        /// Records carried by the page, in response order
        items: Vec<Item>,
        /// Total page count the API declared on this page
        total_pages: u32,
    },

    /// The page could not be retrieved or decoded
    Failure {
        /// 1-based page number that was requested
        page_number: u32,
        /// What went wrong
        reason: FailureReason,
    },
}

impl PageResult {
    /// Returns true for the `Success` variant
    pub fn is_success(&self) -> bool {
        matches!(self, PageResult::Success { .. })
    }

    /// The page number this result belongs to
    pub fn page_number(&self) -> u32 {
        match self {
            PageResult::Success { page_number, .. } => *page_number,
            PageResult::Failure { page_number, .. } => *page_number,
        }
    }
}

/// Why a page fetch failed
///
/// Upstream treatment is identical for every variant (the page counts as
/// missing); the split exists for log lines and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection, TLS, or timeout problem
    Transport(String),
    /// Non-200 response status
    HttpStatus(u16),
    /// Body was not the expected JSON shape
    Decode(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(message) => write!(f, "transport error: {}", message),
            FailureReason::HttpStatus(status) => write!(f, "HTTP {}", status),
            FailureReason::Decode(message) => write!(f, "decode error: {}", message),
        }
    }
}

/// Wire shape of one events page
#[derive(Debug, Deserialize)]
struct PagePayload {
    #[serde(default)]
    items: Vec<Item>,

    /// Absent or zero means the listing extent is unknown
    #[serde(rename = "totalPages", default)]
    total_pages: u32,
}

/// An immutable request for one page: the configured filter parameters
/// overlaid with the page number
#[derive(Debug, Clone)]
pub struct PageRequest {
    page_number: u32,
    query: Vec<(&'static str, String)>,
}

impl PageRequest {
    /// Builds the request for the given page
    pub fn new(page_number: u32, config: &Config) -> Self {
        let mut query = config.filters.query_pairs();
        query.push(("PageNumber", page_number.to_string()));
        Self { page_number, query }
    }

    /// The page this request addresses
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Full query-parameter list, filters plus page number
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

/// Builds the HTTP client used for every fetch in a run
///
/// All headers are static configuration: browser-impersonation fields plus
/// the portal's custom tokens. The pool cap is deliberately looser than the
/// scrape concurrency limit so the semaphore stays the binding constraint.
/// The client (and with it the connection pool) lives exactly as long as the
/// run that created it.
pub fn build_http_client(config: &Config) -> Result<Client, TenderError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "accept",
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        "accept-language",
        HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8,ru;q=0.7,az;q=0.6"),
    );
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("origin", header_value(&config.api.origin, "origin")?);
    headers.insert("referer", header_value(&config.api.referer, "referer")?);
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Chromium\";v=\"140\", \"Not=A?Brand\";v=\"24\", \"Google Chrome\";v=\"140\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"macOS\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));
    headers.insert(
        "x-origin-token",
        header_value(&config.api.origin_token, "x-origin-token")?,
    );
    headers.insert(
        "x-recaptcha-token",
        header_value(&config.api.recaptcha_token, "x-recaptcha-token")?,
    );
    headers.insert(
        "x-xsrf-token",
        header_value(&config.api.xsrf_token, "x-xsrf-token")?,
    );

    let client = Client::builder()
        .user_agent(&config.api.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.scraper.request_timeout_secs))
        .pool_max_idle_per_host(config.scraper.pool_max_idle_per_host)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, TenderError> {
    HeaderValue::from_str(value).map_err(|_| TenderError::InvalidHeader(name))
}

/// Fetches a single page of tender listings
///
/// A short courtesy delay is applied before sending; the wall-clock timeout
/// on the client covers the whole exchange. On HTTP 200 the body is decoded
/// and returned as `Success`; any transport, status, or decode problem
/// becomes a `Failure` value so the caller can keep scheduling other pages.
/// One log line is emitted per attempt.
pub async fn fetch_page(client: &Client, config: &Config, page_number: u32) -> PageResult {
    tokio::time::sleep(Duration::from_millis(config.scraper.request_delay_ms)).await;

    let request = PageRequest::new(page_number, config);

    let response = match client
        .get(&config.api.base_url)
        .query(request.query())
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            let reason = classify_error(&e);
            tracing::error!("Error fetching page {}: {}", page_number, reason);
            return PageResult::Failure {
                page_number,
                reason,
            };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!(
            "Failed to fetch page {}: HTTP {}",
            page_number,
            status.as_u16()
        );
        return PageResult::Failure {
            page_number,
            reason: FailureReason::HttpStatus(status.as_u16()),
        };
    }

    match response.json::<PagePayload>().await {
        Ok(payload) => {
            tracing::info!("Successfully fetched page {}", page_number);
            PageResult::Success {
                page_number,
                items: payload.items,
                total_pages: payload.total_pages,
            }
        }
        Err(e) => {
            let reason = classify_error(&e);
            tracing::error!("Error fetching page {}: {}", page_number, reason);
            PageResult::Failure {
                page_number,
                reason,
            }
        }
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(e: &reqwest::Error) -> FailureReason {
    if e.is_timeout() {
        FailureReason::Transport("request timeout".to_string())
    } else if e.is_connect() {
        FailureReason::Transport("connection refused".to_string())
    } else if e.is_decode() {
        FailureReason::Decode(e.to_string())
    } else {
        FailureReason::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = Config::default();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_token_with_control_characters() {
        let mut config = Config::default();
        config.api.origin_token = "token\nwith\nnewlines".to_string();
        assert!(matches!(
            build_http_client(&config),
            Err(TenderError::InvalidHeader("x-origin-token"))
        ));
    }

    #[test]
    fn test_page_result_accessors() {
        let success = PageResult::Success {
            page_number: 4,
            items: Vec::new(),
            total_pages: 9,
        };
        let failure = PageResult::Failure {
            page_number: 6,
            reason: FailureReason::HttpStatus(404),
        };

        assert!(success.is_success());
        assert!(!failure.is_success());
        assert_eq!(success.page_number(), 4);
        assert_eq!(failure.page_number(), 6);
    }

    #[test]
    fn test_page_request_overlays_page_number() {
        let config = Config::default();
        let request = PageRequest::new(3, &config);

        assert_eq!(request.page_number(), 3);
        assert!(request
            .query()
            .contains(&("PageNumber", "3".to_string())));
        // Static filters come through untouched
        assert!(request.query().contains(&("EventType", "2".to_string())));
        assert!(request.query().contains(&("PageSize", "15".to_string())));
    }

    #[test]
    fn test_distinct_requests_do_not_share_page_numbers() {
        let config = Config::default();
        let first = PageRequest::new(1, &config);
        let second = PageRequest::new(2, &config);

        assert!(first.query().contains(&("PageNumber", "1".to_string())));
        assert!(second.query().contains(&("PageNumber", "2".to_string())));
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::HttpStatus(503).to_string(),
            "HTTP 503"
        );
        assert_eq!(
            FailureReason::Transport("request timeout".to_string()).to_string(),
            "transport error: request timeout"
        );
        assert!(FailureReason::Decode("bad json".to_string())
            .to_string()
            .starts_with("decode error"));
    }
}
