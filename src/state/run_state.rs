//! Aggregate state for one scrape invocation
//!
//! A `RunState` is created per run, populated batch by batch, handed
//! read-only to the export layer, and discarded afterwards. Nothing is
//! persisted between runs.

use crate::scraper::PageResult;
use serde_json::Value;
use std::collections::BTreeSet;

/// A single tender record as returned by the API
///
/// The field set is decided by the API response rather than a compile-time
/// schema, so records are kept as ordered string-to-scalar mappings and the
/// export layer derives its columns from the data.
pub type Item = serde_json::Map<String, Value>;

/// The mutable aggregate produced by one full scrape
///
/// `total_pages` is set once at construction and never changes. `items` is
/// append-only; its order is batch-completion order, not page order. The
/// failed-page set only grows. Mutation happens exclusively on the
/// controller's side of a batch join, so tasks never touch this state.
#[derive(Debug)]
pub struct RunState {
    total_pages: u32,
    items: Vec<Item>,
    failed_pages: BTreeSet<u32>,
}

impl RunState {
    /// Creates a run state for the given page count
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            items: Vec::new(),
            failed_pages: BTreeSet::new(),
        }
    }

    /// Creates the empty state used when pagination discovery fails
    pub fn empty() -> Self {
        Self::new(0)
    }

    /// Total page count reported by the API; 0 means the run was stopped
    /// before any scheduling happened
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// All collected items, in batch-completion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items collected so far
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no items were collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pages that failed to fetch or decode
    pub fn failed_pages(&self) -> &BTreeSet<u32> {
        &self.failed_pages
    }

    /// Merges a batch of page results into the run state
    ///
    /// Successful pages contribute their items in the payload's own order;
    /// failed pages are recorded and logged, never retried here.
    pub fn merge(&mut self, results: Vec<PageResult>) {
        for result in results {
            match result {
                PageResult::Success { items, .. } => {
                    self.items.extend(items);
                }
                PageResult::Failure {
                    page_number,
                    reason,
                } => {
                    tracing::warn!("Skipping failed page {}: {}", page_number, reason);
                    self.failed_pages.insert(page_number);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::FailureReason;
    use serde_json::json;

    fn item(id: u64) -> Item {
        let mut item = Item::new();
        item.insert("eventId".to_string(), json!(id));
        item
    }

    fn success(page_number: u32, ids: &[u64]) -> PageResult {
        PageResult::Success {
            page_number,
            items: ids.iter().copied().map(item).collect(),
            total_pages: 3,
        }
    }

    fn failure(page_number: u32) -> PageResult {
        PageResult::Failure {
            page_number,
            reason: FailureReason::HttpStatus(500),
        }
    }

    #[test]
    fn test_merge_appends_success_items() {
        let mut state = RunState::new(3);
        state.merge(vec![success(1, &[1, 2]), success(2, &[3])]);

        assert_eq!(state.item_count(), 3);
        assert!(state.failed_pages().is_empty());
    }

    #[test]
    fn test_merge_records_failures_without_items() {
        let mut state = RunState::new(3);
        state.merge(vec![success(1, &[1]), failure(2), success(3, &[5])]);

        assert_eq!(state.item_count(), 2);
        assert_eq!(state.failed_pages().iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_item_count_matches_success_sum() {
        let results = vec![success(1, &[1, 2]), failure(2), success(3, &[3, 4, 5])];
        let success_total: usize = results
            .iter()
            .map(|r| match r {
                PageResult::Success { items, .. } => items.len(),
                PageResult::Failure { .. } => 0,
            })
            .sum();

        let mut state = RunState::new(3);
        state.merge(results);

        assert_eq!(state.item_count(), success_total);
        assert_eq!(state.failed_pages().len() + 2, state.total_pages() as usize);
    }

    #[test]
    fn test_batches_merge_in_order() {
        let mut state = RunState::new(5);
        state.merge(vec![success(2, &[20]), success(3, &[30])]);
        state.merge(vec![success(4, &[40]), success(5, &[50])]);

        let ids: Vec<u64> = state
            .items()
            .iter()
            .map(|item| item["eventId"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![20, 30, 40, 50]);
    }

    #[test]
    fn test_failed_pages_grow_monotonically() {
        let mut state = RunState::new(4);
        state.merge(vec![failure(2)]);
        state.merge(vec![failure(4)]);

        let failed: Vec<u32> = state.failed_pages().iter().copied().collect();
        assert_eq!(failed, vec![2, 4]);
    }

    #[test]
    fn test_empty_state_reports_zero_pages() {
        let state = RunState::empty();
        assert_eq!(state.total_pages(), 0);
        assert!(state.is_empty());
    }
}
