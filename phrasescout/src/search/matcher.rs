use crate::errors::{SearchError, SearchResult};

/// Finds every occurrence of a single phrase in a document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatcher<'a> {
    phrase: &'a str,
}

impl<'a> PhraseMatcher<'a> {
    /// Creates a matcher, rejecting the empty phrase
    pub fn new(phrase: &'a str) -> SearchResult<Self> {
        if phrase.is_empty() {
            return Err(SearchError::invalid_input("search phrase is empty"));
        }
        Ok(Self { phrase })
    }

    pub fn phrase(&self) -> &'a str {
        self.phrase
    }

    /// Returns the character offset of each non-overlapping occurrence,
    /// scanning left to right
    pub fn find_in(&self, body: &str) -> Vec<usize> {
        let mut offsets = Vec::new();
        // Byte and char position of the previous match, so each stretch of
        // the body is counted once.
        let mut last_byte = 0;
        let mut last_char = 0;

        for (byte_offset, _) in body.match_indices(self.phrase) {
            last_char += body[last_byte..byte_offset].chars().count();
            last_byte = byte_offset;
            offsets.push(last_char);
        }
        offsets
    }
}

/// Finds the ascending character offsets of `phrase` in `body`
pub fn find_offsets(body: &str, phrase: &str) -> SearchResult<Vec<usize>> {
    Ok(PhraseMatcher::new(phrase)?.find_in(body))
}
