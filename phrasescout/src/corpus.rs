//! Documents, phrase sets, and the loaders that build them from disk.
//!
//! A [`Document`] is a title plus the body that gets searched. The title is
//! never part of the body, so offsets reported by a search are relative to
//! the text that follows the title.
//!
//! Corpora come in two shapes:
//! - a single file holding many works, separated by a delimiter (`@` by
//!   default), each work starting with its title line;
//! - a directory, where every text file is one work.
use ignore::WalkBuilder;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::config::{EncodingMode, SearchConfig};
use crate::errors::{SearchError, SearchResult};
use crate::filters::is_corpus_file;

/// Files at or above this size are memory-mapped instead of read
pub(crate) const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// A titled text whose body is searched for phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    title: String,
    body: String,
}

impl Document {
    /// Creates a document from an already separated title and body
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Splits raw text into a title (the first line) and the body after it.
    ///
    /// The line break ending the title stays at the front of the body. Text
    /// without a line break is all title and has an empty body.
    pub fn parse(raw: &str) -> Self {
        let mut title_len = raw.find('\n').unwrap_or(raw.len());
        if raw[..title_len].ends_with('\r') {
            title_len -= 1;
        }
        let (title, body) = raw.split_at(title_len);
        Self::new(title, body)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Ordered, duplicate-free list of case-sensitive search phrases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    /// Builds a phrase set, keeping the first occurrence of any duplicate
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for phrase in phrases {
            let phrase: String = phrase.into();
            if seen.insert(phrase.clone()) {
                unique.push(phrase);
            }
        }
        Self { phrases: unique }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Splits a collected-works text into documents at every occurrence of the
/// delimiter, including occurrences in the middle of a line.
///
/// Blank sections (such as the empty text before a leading delimiter) are
/// skipped.
pub fn split_documents(text: &str, delimiter: &str) -> Vec<Document> {
    text.split(delimiter)
        .filter(|section| !section.trim().is_empty())
        .map(|section| Document::parse(section.trim_start_matches(['\r', '\n'])))
        .collect()
}

/// Decodes file bytes according to the encoding mode
fn decode_bytes(bytes: &[u8], path: &Path, encoding_mode: EncodingMode) -> SearchResult<String> {
    match encoding_mode {
        EncodingMode::FailFast => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => Ok(text),
                Err(e) => Err(SearchError::encoding_error(path, e)),
            },
        },
        EncodingMode::Lossy => {
            let cow = String::from_utf8_lossy(bytes);
            if let std::borrow::Cow::Owned(_) = cow {
                warn!("Invalid UTF-8 replaced in file: {}", path.display());
            }
            Ok(cow.into_owned())
        }
    }
}

/// Reads a whole text file, mapping it into memory when it is large
pub fn read_text(path: &Path, encoding_mode: EncodingMode) -> SearchResult<String> {
    let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);

    if size >= MMAP_THRESHOLD {
        trace!("Memory-mapping {} ({} bytes)", path.display(), size);
        let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
        decode_bytes(&mmap, path, encoding_mode)
    } else {
        trace!("Reading {} ({} bytes)", path.display(), size);
        let bytes = std::fs::read(path).map_err(|e| SearchError::from_io(path, e))?;
        decode_bytes(&bytes, path, encoding_mode)
    }
}

/// Loads a corpus from a single delimited file or from a directory tree.
///
/// Directory documents are ordered by path so that repeated loads produce
/// the same document order.
pub fn load_corpus(path: &Path, config: &SearchConfig) -> SearchResult<Vec<Document>> {
    if !path.exists() {
        return Err(SearchError::file_not_found(path));
    }

    let documents = if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|file| is_corpus_file(file, path, config))
            .collect();
        files.sort();
        debug!("Found {} corpus files under {}", files.len(), path.display());

        files
            .par_iter()
            .map(|file| read_text(file, config.encoding_mode).map(|text| Document::parse(&text)))
            .collect::<SearchResult<Vec<_>>>()?
    } else {
        let text = read_text(path, config.encoding_mode)?;
        split_documents(&text, &config.document_delimiter)
    };

    info!(
        "Loaded {} documents from {}",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

/// Loads phrases from a file, one per line, skipping blank lines
pub fn load_phrases(path: &Path) -> SearchResult<PhraseSet> {
    let text = std::fs::read_to_string(path).map_err(|e| SearchError::from_io(path, e))?;
    let phrases: PhraseSet = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    debug!("Loaded {} phrases from {}", phrases.len(), path.display());
    Ok(phrases)
}
