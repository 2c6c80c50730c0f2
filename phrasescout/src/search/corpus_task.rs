use tracing::trace;

use super::document_task::DocumentSearchTask;
use super::{min_split_size, TaskContext};
use crate::corpus::Document;
use crate::errors::SearchResult;
use crate::results::{DocumentResult, SearchOutcome};

/// Searches a list of documents for a list of phrases, splitting the
/// document list across workers
#[derive(Debug, Clone, Copy)]
pub struct CorpusSearchTask<'a> {
    documents: &'a [Document],
    phrases: &'a [String],
    min_split_size: usize,
    phrase_split_threshold: Option<usize>,
    context: TaskContext<'a>,
}

impl<'a> CorpusSearchTask<'a> {
    /// Creates the root of a document-splitting tree.
    ///
    /// `document_split_threshold` defaults to half of `documents.len()` and
    /// stays fixed for every subtask. `phrase_split_threshold` is passed to
    /// each document's own phrase-splitting tree.
    pub fn new(
        documents: &'a [Document],
        phrases: &'a [String],
        document_split_threshold: Option<usize>,
        phrase_split_threshold: Option<usize>,
        context: TaskContext<'a>,
    ) -> Self {
        Self {
            documents,
            phrases,
            min_split_size: min_split_size(document_split_threshold, documents.len()),
            phrase_split_threshold,
            context,
        }
    }

    fn subtask(&self, documents: &'a [Document]) -> Self {
        Self { documents, ..*self }
    }

    pub fn min_split_size(&self) -> usize {
        self.min_split_size
    }

    /// Returns the results of every matching document, in document order
    pub fn compute(&self) -> SearchResult<SearchOutcome> {
        if self.documents.len() <= self.min_split_size {
            self.compute_sequentially()
        } else {
            self.split_document_list(self.documents.len() / 2)
        }
    }

    fn compute_sequentially(&self) -> SearchResult<SearchOutcome> {
        self.context.metrics.record_document_leaf();
        trace!(
            "{} searching {} documents",
            self.context.scheduler.worker_id(),
            self.documents.len()
        );

        let mut outcome = SearchOutcome::new();
        for document in self.documents {
            let matches = DocumentSearchTask::new(
                document,
                self.phrases,
                self.phrase_split_threshold,
                self.context,
            )
            .compute()?;
            outcome.add_document_result(DocumentResult::new(document.title(), matches));
        }
        Ok(outcome)
    }

    fn split_document_list(&self, split_pos: usize) -> SearchResult<SearchOutcome> {
        self.context.metrics.record_document_split();
        let (left_documents, right_documents) = self.documents.split_at(split_pos);
        let left_task = self.subtask(left_documents);
        let right_task = self.subtask(right_documents);

        let (left, right) = self
            .context
            .scheduler
            .fork_join(|| left_task.compute(), || right_task.compute());

        let mut outcome = left?;
        outcome.merge(right?);
        Ok(outcome)
    }
}
