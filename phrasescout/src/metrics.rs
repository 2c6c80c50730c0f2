use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::scheduler::WorkerId;

/// Tracks how a search tree was split and where its work ran.
///
/// Clones share the same counters, so a clone can be handed to every task
/// in the tree.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Splitting
    document_splits: Arc<AtomicU64>,
    phrase_splits: Arc<AtomicU64>,

    // Sequential leaves
    document_leaves: Arc<AtomicU64>,
    phrase_leaves: Arc<AtomicU64>,

    // Matching
    matcher_calls: Arc<AtomicU64>,
    results_produced: Arc<AtomicU64>,

    // Non-empty results per worker
    worker_results: Arc<DashMap<WorkerId, u64>>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            document_splits: Arc::new(AtomicU64::new(0)),
            phrase_splits: Arc::new(AtomicU64::new(0)),
            document_leaves: Arc::new(AtomicU64::new(0)),
            phrase_leaves: Arc::new(AtomicU64::new(0)),
            matcher_calls: Arc::new(AtomicU64::new(0)),
            results_produced: Arc::new(AtomicU64::new(0)),
            worker_results: Arc::new(DashMap::new()),
        }
    }

    /// Records a document list split in two
    pub fn record_document_split(&self) {
        self.document_splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a phrase list split in two
    pub fn record_phrase_split(&self) {
        self.phrase_splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a document list searched sequentially
    pub fn record_document_leaf(&self) {
        self.document_leaves.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a phrase list matched sequentially
    pub fn record_phrase_leaf(&self) {
        self.phrase_leaves.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one matcher call and whether it found anything
    pub fn record_match(&self, worker: WorkerId, found: bool) {
        self.matcher_calls.fetch_add(1, Ordering::Relaxed);
        if found {
            self.results_produced.fetch_add(1, Ordering::Relaxed);
            *self.worker_results.entry(worker).or_insert(0) += 1;
        }
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            document_splits: self.document_splits.load(Ordering::Relaxed),
            phrase_splits: self.phrase_splits.load(Ordering::Relaxed),
            document_leaves: self.document_leaves.load(Ordering::Relaxed),
            phrase_leaves: self.phrase_leaves.load(Ordering::Relaxed),
            matcher_calls: self.matcher_calls.load(Ordering::Relaxed),
            results_produced: self.results_produced.load(Ordering::Relaxed),
        }
    }

    /// Non-empty results produced by each worker, ordered by worker id
    pub fn worker_distribution(&self) -> Vec<(WorkerId, u64)> {
        let mut distribution: Vec<_> = self
            .worker_results
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        distribution.sort_unstable_by_key(|&(worker, _)| worker);
        distribution
    }

    /// Zeroes every counter
    pub fn reset(&self) {
        for counter in [
            &self.document_splits,
            &self.phrase_splits,
            &self.document_leaves,
            &self.phrase_leaves,
            &self.matcher_calls,
            &self.results_produced,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.worker_results.clear();
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Splits (documents/phrases): {}/{}\n\
             Sequential leaves (documents/phrases): {}/{}\n\
             Matcher calls: {}\n\
             Results produced: {}\n\
             Workers producing results: {}",
            stats.document_splits,
            stats.phrase_splits,
            stats.document_leaves,
            stats.phrase_leaves,
            stats.matcher_calls,
            stats.results_produced,
            self.worker_results.len()
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub document_splits: u64,
    pub phrase_splits: u64,
    pub document_leaves: u64,
    pub phrase_leaves: u64,
    pub matcher_calls: u64,
    pub results_produced: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_leaf_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_document_split();
        metrics.record_phrase_split();
        metrics.record_phrase_split();
        metrics.record_document_leaf();
        metrics.record_phrase_leaf();

        let stats = metrics.get_stats();
        assert_eq!(stats.document_splits, 1);
        assert_eq!(stats.phrase_splits, 2);
        assert_eq!(stats.document_leaves, 1);
        assert_eq!(stats.phrase_leaves, 1);
    }

    #[test]
    fn test_match_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_match(WorkerId(1), true);
        metrics.record_match(WorkerId(0), true);
        metrics.record_match(WorkerId(1), true);
        metrics.record_match(WorkerId(2), false);

        let stats = metrics.get_stats();
        assert_eq!(stats.matcher_calls, 4);
        assert_eq!(stats.results_produced, 3);
        assert_eq!(
            metrics.worker_distribution(),
            vec![(WorkerId(0), 1), (WorkerId(1), 2)]
        );
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SearchMetrics::new();
        let clone = metrics.clone();

        clone.record_document_split();
        assert_eq!(metrics.get_stats().document_splits, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = SearchMetrics::new();
        metrics.record_phrase_split();
        metrics.record_match(WorkerId(3), true);

        metrics.reset();
        assert_eq!(metrics.get_stats(), SearchMetrics::new().get_stats());
        assert!(metrics.worker_distribution().is_empty());
    }
}
