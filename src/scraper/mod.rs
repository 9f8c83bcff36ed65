//! Scraper module: discovery, concurrent fetching, and run orchestration
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with static portal headers
//! - Pagination discovery from page 1
//! - Batch scheduling under a global concurrency cap
//! - The run entry point tying scrape and export together

mod controller;
mod fetcher;
mod paginator;

pub use controller::Controller;
pub use fetcher::{build_http_client, fetch_page, FailureReason, PageRequest, PageResult};
pub use paginator::{discover, Discovery};

use crate::config::Config;
use crate::export::{export_all, ExportPaths};
use crate::TenderError;
use std::time::Instant;

/// Summary of one completed scrape run
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// Items collected across all successful pages
    pub item_count: usize,

    /// Pages that failed and were skipped
    pub failed_pages: Vec<u32>,

    /// Wall-clock duration of the run
    pub elapsed_secs: f64,

    /// Where the exports landed; `None` per format when nothing was written
    pub paths: ExportPaths,
}

/// Runs a complete scrape: discovery, concurrent fetching, and export
///
/// This is the main library entry point. Failed pages are skipped and the
/// rest is exported; the only fatal condition is discovery reporting zero
/// pages, which surfaces as `TenderError::EmptyPagination` with no export
/// attempted.
pub async fn run(config: Config) -> Result<ScrapeOutcome, TenderError> {
    let start = Instant::now();
    tracing::info!("Starting tender scrape");

    let controller = Controller::new(config.clone())?;
    let state = controller.scrape_all().await;

    if state.total_pages() == 0 {
        return Err(TenderError::EmptyPagination);
    }

    if state.is_empty() {
        tracing::error!("No data was scraped");
    }

    let paths = export_all(&state, &config.output)?;

    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!("Scraping completed in {:.2} seconds", elapsed);
    tracing::info!("Total items scraped: {}", state.item_count());

    Ok(ScrapeOutcome {
        item_count: state.item_count(),
        failed_pages: state.failed_pages().iter().copied().collect(),
        elapsed_secs: elapsed,
        paths,
    })
}
