//! Batch scheduling of page fetches under a global concurrency cap
//!
//! This module contains the scheduling core of the scraper:
//! - A global semaphore bounding simultaneous in-flight requests
//! - Fixed-size batches awaited to completion before the next one starts
//! - A fixed pause between batches as coarse backpressure on the portal
//! - Per-task error capture, so one bad page never aborts its siblings

use crate::config::Config;
use crate::scraper::fetcher::{build_http_client, fetch_page, FailureReason, PageResult};
use crate::scraper::paginator::discover;
use crate::state::RunState;
use crate::TenderError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Schedules every page fetch of a run
///
/// The semaphore bounds in-flight requests independently of the client's
/// connection pool; with the default limits (5 permits against a pool of 10)
/// the semaphore is the binding constraint. Spawned tasks only ever return
/// values; all `RunState` mutation happens here after a batch has fully
/// joined.
pub struct Controller {
    config: Arc<Config>,
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl Controller {
    /// Creates a controller with a fresh HTTP client scoped to this run
    pub fn new(config: Config) -> Result<Self, TenderError> {
        let client = build_http_client(&config)?;
        let semaphore = Arc::new(Semaphore::new(config.scraper.concurrent_requests));

        Ok(Self {
            config: Arc::new(config),
            client,
            semaphore,
        })
    }

    /// Fetches every page of the current result set
    ///
    /// Pages `2..=total_pages` are spawned in fixed-size batches, each task
    /// holding one semaphore permit for the duration of its fetch. One batch
    /// is awaited to completion and merged before the next is submitted, with
    /// a fixed pause in between regardless of how the batch went. Page 1 is
    /// reused from discovery and merged once the batches are done, not
    /// fetched a second time. When discovery reports zero pages the
    /// controller does no work and returns an empty state.
    pub async fn scrape_all(&self) -> RunState {
        let discovery = discover(&self.client, &self.config).await;

        if discovery.total_pages == 0 {
            tracing::error!("Could not determine total pages");
            return RunState::empty();
        }

        let total_pages = discovery.total_pages;
        tracing::info!("Total pages to scrape: {}", total_pages);

        let mut state = RunState::new(total_pages);
        let remaining: Vec<u32> = (2..=total_pages).collect();
        let batch_size = self.config.scraper.batch_size;
        let batch_count = remaining.len().div_ceil(batch_size);

        for (batch_index, batch) in remaining.chunks(batch_size).enumerate() {
            let results = self.run_batch(batch).await;
            state.merge(results);

            tracing::info!("Completed batch {}/{}", batch_index + 1, batch_count);

            if batch_index + 1 < batch_count {
                tokio::time::sleep(Duration::from_millis(self.config.scraper.batch_pause_ms))
                    .await;
            }
        }

        state.merge(vec![discovery.first_page]);

        tracing::info!("Scraped {} total items", state.item_count());
        state
    }

    /// Spawns one fetch task per page and joins them all
    ///
    /// Each task acquires a permit before sending and releases it on every
    /// exit path by holding it as an RAII guard. Tasks never abort their
    /// siblings: a panicked or cancelled task is converted into a `Failure`
    /// for its page.
    async fn run_batch(&self, pages: &[u32]) -> Vec<PageResult> {
        let mut handles = Vec::with_capacity(pages.len());

        for &page_number in pages {
            let client = self.client.clone();
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&self.semaphore);

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        // The semaphore is never closed while a run is live
                        return PageResult::Failure {
                            page_number,
                            reason: FailureReason::Transport("scheduler shut down".to_string()),
                        };
                    }
                };

                fetch_page(&client, &config, page_number).await
            });

            handles.push((page_number, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (page_number, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(PageResult::Failure {
                    page_number,
                    reason: FailureReason::Transport(format!("task failed: {}", e)),
                }),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semaphore_uses_configured_limit() {
        let mut config = Config::default();
        config.scraper.concurrent_requests = 3;

        let controller = Controller::new(config).unwrap();
        assert_eq!(controller.semaphore.available_permits(), 3);
    }

    #[test]
    fn test_default_limit_is_tighter_than_pool() {
        let config = Config::default();
        let pool = config.scraper.pool_max_idle_per_host;

        let controller = Controller::new(config).unwrap();
        assert!(controller.semaphore.available_permits() < pool);
    }
}
