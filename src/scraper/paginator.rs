//! Pagination discovery
//!
//! The portal reports the total page count on every result page, so one
//! probe of page 1 tells the scheduler the extent of the run.

use crate::config::Config;
use crate::scraper::fetcher::{fetch_page, PageResult};
use reqwest::Client;

/// Outcome of probing page 1
#[derive(Debug)]
pub struct Discovery {
    /// Total page count the API reported; 0 is the sentinel for unknown or
    /// empty and must stop the run
    pub total_pages: u32,

    /// The page-1 result, carried forward so its items are merged rather
    /// than fetched a second time
    pub first_page: PageResult,
}

/// Probes page 1 to learn the total page count
///
/// A failed probe, or a success that reports no pages, yields
/// `total_pages == 0`; callers treat that as a hard stop for the whole run.
pub async fn discover(client: &Client, config: &Config) -> Discovery {
    let first_page = fetch_page(client, config, 1).await;

    let total_pages = match &first_page {
        PageResult::Success { total_pages, .. } => *total_pages,
        PageResult::Failure { .. } => 0,
    };

    Discovery {
        total_pages,
        first_page,
    }
}
