use tracing::trace;

use super::matcher::PhraseMatcher;
use super::{min_split_size, TaskContext};
use crate::corpus::Document;
use crate::errors::SearchResult;
use crate::results::MatchResult;

/// Searches one document for a list of phrases, splitting the phrase list
/// across workers
#[derive(Debug, Clone, Copy)]
pub struct DocumentSearchTask<'a> {
    document: &'a Document,
    phrases: &'a [String],
    min_split_size: usize,
    context: TaskContext<'a>,
}

impl<'a> DocumentSearchTask<'a> {
    /// Creates the root of a phrase-splitting tree.
    ///
    /// The split threshold is `configured`, or half of `phrases.len()` when
    /// unset, and stays fixed for every subtask.
    pub fn new(
        document: &'a Document,
        phrases: &'a [String],
        configured: Option<usize>,
        context: TaskContext<'a>,
    ) -> Self {
        Self {
            document,
            phrases,
            min_split_size: min_split_size(configured, phrases.len()),
            context,
        }
    }

    fn subtask(&self, phrases: &'a [String]) -> Self {
        Self { phrases, ..*self }
    }

    pub fn min_split_size(&self) -> usize {
        self.min_split_size
    }

    /// Returns the non-empty matches for this task's phrases, in phrase order
    pub fn compute(&self) -> SearchResult<Vec<MatchResult>> {
        if self.phrases.len() <= self.min_split_size {
            self.compute_sequentially()
        } else {
            self.split_phrase_list(self.phrases.len() / 2)
        }
    }

    fn compute_sequentially(&self) -> SearchResult<Vec<MatchResult>> {
        let worker = self.context.scheduler.worker_id();
        let metrics = self.context.metrics;
        metrics.record_phrase_leaf();
        trace!(
            "{} matching {} phrases in '{}'",
            worker,
            self.phrases.len(),
            self.document.title()
        );

        let mut results = Vec::new();
        for phrase in self.phrases {
            let offsets = PhraseMatcher::new(phrase)?.find_in(self.document.body());
            metrics.record_match(worker, !offsets.is_empty());
            if !offsets.is_empty() {
                results.push(MatchResult::new(
                    self.document.title(),
                    phrase.as_str(),
                    offsets,
                    worker,
                ));
            }
        }
        Ok(results)
    }

    fn split_phrase_list(&self, split_pos: usize) -> SearchResult<Vec<MatchResult>> {
        self.context.metrics.record_phrase_split();
        let (left_phrases, right_phrases) = self.phrases.split_at(split_pos);
        let left_task = self.subtask(left_phrases);
        let right_task = self.subtask(right_phrases);

        let (left, right) = self
            .context
            .scheduler
            .fork_join(|| left_task.compute(), || right_task.compute());

        let mut results = left?;
        results.extend(right?);
        Ok(results)
    }
}
