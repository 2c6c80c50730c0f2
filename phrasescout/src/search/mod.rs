/// This module implements the parallel phrase search.
///
/// # Task Tree
///
/// A search is a two-level fork/join tree:
///
/// 1. **Corpus level**: a [`CorpusSearchTask`] halves the document list
///    until it is no longer than its split threshold, then searches those
///    documents one after another.
/// 2. **Document level**: for each document a [`DocumentSearchTask`] halves
///    the phrase list the same way, then runs a [`PhraseMatcher`] per phrase.
///
/// At each split the left half is offered to the pool for stealing while the
/// current worker recurses into the right half:
/// ```rust,ignore
/// let (left, right) = scheduler.fork_join(|| left_task.compute(), || right_task.compute());
/// let mut results = left?;
/// results.extend(right?);
/// ```
///
/// Results are concatenated left then right when the parent resumes, so the
/// output follows input order no matter which half finished first.
///
/// # Split Thresholds
///
/// Each tree fixes its threshold once, from the length of the list it was
/// created with, and hands it unchanged to every subtask. A list whose length
/// is at or below the threshold runs sequentially; a longer one splits at its
/// midpoint.
pub mod corpus_task;
pub mod document_task;
pub mod engine;
pub mod matcher;

pub use corpus_task::CorpusSearchTask;
pub use document_task::DocumentSearchTask;
pub use engine::{search, SearchEngine};
pub use matcher::{find_offsets, PhraseMatcher};

use crate::metrics::SearchMetrics;
use crate::scheduler::Scheduler;

/// Shared, read-only handles every task in a tree needs
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub scheduler: &'a Scheduler,
    pub metrics: &'a SearchMetrics,
}

impl<'a> TaskContext<'a> {
    pub fn new(scheduler: &'a Scheduler, metrics: &'a SearchMetrics) -> Self {
        Self { scheduler, metrics }
    }
}

/// Resolves the minimum split size for a tree over `initial_len` items.
///
/// Without an override this is half the initial length. The result is never
/// below 1, so a single item is always handled sequentially.
pub fn min_split_size(configured: Option<usize>, initial_len: usize) -> usize {
    configured.unwrap_or(initial_len / 2).max(1)
}
