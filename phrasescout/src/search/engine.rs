use tracing::{debug, info};

use super::corpus_task::CorpusSearchTask;
use super::TaskContext;
use crate::config::SearchConfig;
use crate::corpus::{Document, PhraseSet};
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;
use crate::results::SearchOutcome;
use crate::scheduler::Scheduler;

/// Runs phrase searches on a work-stealing pool it keeps between searches
#[derive(Debug)]
pub struct SearchEngine {
    scheduler: Scheduler,
    document_split_threshold: Option<usize>,
    phrase_split_threshold: Option<usize>,
    metrics: SearchMetrics,
}

impl SearchEngine {
    /// Creates an engine with a pool of `config.thread_count` workers
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        Self::with_scheduler(Scheduler::new(config.thread_count), config)
    }

    /// Creates an engine on an existing scheduler
    pub fn with_scheduler(scheduler: Scheduler, config: &SearchConfig) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self {
            scheduler,
            document_split_threshold: config.document_split_threshold,
            phrase_split_threshold: config.phrase_split_threshold,
            metrics: SearchMetrics::new(),
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Counters for the most recent search run by this engine
    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Finds every occurrence of every phrase in every document.
    ///
    /// Blocks until the whole task tree has finished. On success the outcome
    /// lists matching documents in input order, each with its matching
    /// phrases in phrase order. On failure no partial outcome is returned.
    pub fn search(
        &self,
        documents: &[Document],
        phrases: &PhraseSet,
    ) -> SearchResult<SearchOutcome> {
        info!(
            "Starting search of {} documents for {} phrases",
            documents.len(),
            phrases.len()
        );
        self.metrics.reset();

        if documents.is_empty() || phrases.is_empty() {
            debug!("Nothing to search, returning empty outcome");
            return Ok(SearchOutcome::new());
        }

        let context = TaskContext::new(&self.scheduler, &self.metrics);
        let root = CorpusSearchTask::new(
            documents,
            phrases.as_slice(),
            self.document_split_threshold,
            self.phrase_split_threshold,
            context,
        );
        debug!(
            "Document split threshold {} on {} workers",
            root.min_split_size(),
            self.scheduler.thread_count()
        );

        let outcome = self.scheduler.submit_root(|| root.compute())?;

        self.metrics.log_stats();
        info!(
            "Search complete. Found {} matches in {} documents",
            outcome.total_matches, outcome.documents_with_matches
        );

        Ok(outcome)
    }
}

/// Searches `documents` for `phrases` with the default configuration
pub fn search(documents: &[Document], phrases: &PhraseSet) -> SearchResult<SearchOutcome> {
    SearchEngine::new(&SearchConfig::default())?.search(documents, phrases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use std::num::NonZeroUsize;

    fn scenario_documents() -> Vec<Document> {
        vec![
            Document::new("A", "the cat sat on the mat"),
            Document::new("B", "a cat cat"),
        ]
    }

    #[test]
    fn test_search_scenario() {
        let outcome = search(&scenario_documents(), &PhraseSet::new(["cat", "dog"])).unwrap();

        assert_eq!(outcome.document_results.len(), 2);
        let a = &outcome.document_results[0];
        assert_eq!(a.title, "A");
        assert_eq!(a.matches.len(), 1);
        assert_eq!(a.matches[0].phrase, "cat");
        assert_eq!(a.matches[0].offsets, vec![4]);

        let b = &outcome.document_results[1];
        assert_eq!(b.title, "B");
        assert_eq!(b.matches.len(), 1);
        assert_eq!(b.matches[0].offsets, vec![2, 6]);

        assert_eq!(outcome.total_matches, 3);
        assert!(outcome.matches().all(|m| m.phrase != "dog"));
    }

    #[test]
    fn test_empty_phrase_set() {
        let outcome = search(&scenario_documents(), &PhraseSet::default()).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_engine_reuses_pool() {
        let config = SearchConfig {
            thread_count: NonZeroUsize::new(2).unwrap(),
            ..SearchConfig::default()
        };
        let engine = SearchEngine::new(&config).unwrap();
        let phrases = PhraseSet::new(["cat"]);

        let first = engine.search(&scenario_documents(), &phrases).unwrap();
        let second = engine.search(&scenario_documents(), &phrases).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.scheduler().thread_count(), 2);
        assert_eq!(engine.metrics().get_stats().matcher_calls, 2);
    }

    #[test]
    fn test_metrics_cover_only_latest_search() {
        let config = SearchConfig {
            thread_count: NonZeroUsize::new(2).unwrap(),
            document_split_threshold: Some(1),
            ..SearchConfig::default()
        };
        let engine = SearchEngine::new(&config).unwrap();
        let phrases = PhraseSet::new(["cat"]);

        engine.search(&scenario_documents(), &phrases).unwrap();
        let first = engine.metrics().get_stats();
        assert_eq!(first.document_splits, 1);
        assert_eq!(first.matcher_calls, 2);

        engine.search(&scenario_documents(), &phrases).unwrap();
        assert_eq!(engine.metrics().get_stats(), first);

        engine.search(&[], &phrases).unwrap();
        assert_eq!(engine.metrics().get_stats().matcher_calls, 0);
        assert!(engine.metrics().worker_distribution().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SearchConfig {
            document_split_threshold: Some(0),
            ..SearchConfig::default()
        };
        assert!(matches!(
            SearchEngine::with_scheduler(Scheduler::sequential(), &config),
            Err(SearchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_phrase_aborts_search() {
        let result = search(&scenario_documents(), &PhraseSet::new(["cat", ""]));
        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    }
}
