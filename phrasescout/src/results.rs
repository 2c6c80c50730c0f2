/// This module implements the search result types.
///
/// # Ownership of Results
///
/// Results are built by the task that finds them and handed to the parent
/// task by value when the two are joined:
///
/// ```rust,ignore
/// let (mut left, right) = scheduler.fork_join(|| solve(left_half), || solve(right_half));
/// left.merge(right); // right moves into left, nothing is shared
/// ```
///
/// No result is ever visible to two threads at once, so none of these types
/// needs a lock.
///
/// # Empty Results
///
/// A [`MatchResult`] with no offsets and a [`DocumentResult`] with no
/// matches are never stored: [`SearchOutcome::add_document_result`] and the
/// task leaves drop them before they reach a merge.
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::scheduler::WorkerId;

/// Every occurrence of one phrase within one document
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Title of the document the phrase was found in
    pub title: String,
    /// The phrase that was searched for
    pub phrase: String,
    /// Ascending character offsets of each occurrence within the body
    pub offsets: Vec<usize>,
    /// The worker that produced this result
    pub worker: WorkerId,
}

impl MatchResult {
    pub fn new(
        title: impl Into<String>,
        phrase: impl Into<String>,
        offsets: Vec<usize>,
        worker: WorkerId,
    ) -> Self {
        Self {
            title: title.into(),
            phrase: phrase.into(),
            offsets,
            worker,
        }
    }

    /// Number of occurrences
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

// The worker tag is diagnostic; two results are equal when they describe
// the same occurrences no matter which thread found them.
impl PartialEq for MatchResult {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.phrase == other.phrase && self.offsets == other.offsets
    }
}

impl Eq for MatchResult {}

// Writes the derived `count` next to `offsets`.
impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MatchResult", 5)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("phrase", &self.phrase)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("offsets", &self.offsets)?;
        state.serialize_field("worker", &self.worker)?;
        state.end()
    }
}

/// All matches found in a single document, in phrase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentResult {
    /// Title of the document
    pub title: String,
    /// Non-empty matches, one per phrase found
    pub matches: Vec<MatchResult>,
}

impl DocumentResult {
    pub fn new(title: impl Into<String>, matches: Vec<MatchResult>) -> Self {
        Self {
            title: title.into(),
            matches,
        }
    }

    /// Total occurrences across all phrases
    pub fn total_occurrences(&self) -> usize {
        self.matches.iter().map(MatchResult::count).sum()
    }

    /// Finds the result for one phrase
    pub fn find(&self, phrase: &str) -> Option<&MatchResult> {
        self.matches.iter().find(|m| m.phrase == phrase)
    }
}

/// The complete outcome of a search, one entry per matching document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Results per document, in document order
    pub document_results: Vec<DocumentResult>,
    /// Total number of occurrences found
    pub total_matches: usize,
    /// Number of documents with at least one match
    pub documents_with_matches: usize,
}

impl SearchOutcome {
    /// Creates a new empty outcome
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a document result, dropping it if it holds no matches
    pub fn add_document_result(&mut self, document_result: DocumentResult) {
        if document_result.matches.is_empty() {
            return;
        }
        self.total_matches += document_result.total_occurrences();
        self.documents_with_matches += 1;
        self.document_results.push(document_result);
    }

    /// Appends another outcome after this one, preserving both orders
    pub fn merge(&mut self, other: SearchOutcome) {
        self.total_matches += other.total_matches;
        self.documents_with_matches += other.documents_with_matches;
        self.document_results.extend(other.document_results);
    }

    pub fn is_empty(&self) -> bool {
        self.document_results.is_empty()
    }

    /// Iterates over every match of every document
    pub fn matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.document_results.iter().flat_map(|d| d.matches.iter())
    }

    /// Serializes the outcome as pretty-printed JSON
    pub fn to_json(&self) -> crate::errors::SearchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
