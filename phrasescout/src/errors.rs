/// This module defines the error types for phrasescout.
///
/// # Error Taxonomy
///
/// Errors fall into three groups:
///
/// 1. **Input errors**: a malformed document or phrase, detected at the leaf
///    of the task tree and propagated immediately without retry.
/// 2. **Unrecoverable errors**: anything else raised inside a leaf, including
///    a panic on a worker thread. These abort the whole search.
/// 3. **Loading and configuration errors**: raised while reading a corpus or
///    a config file, before any search starts.
///
/// Pool exhaustion has no variant: the scheduler degrades to sequential
/// execution instead of failing.
///
/// # Propagation
///
/// ```rust,ignore
/// match engine.search(&documents, &phrases) {
///     Ok(outcome) => // every document and phrase was searched,
///     Err(SearchError::InvalidInput(msg)) => // a phrase or document was malformed,
///     Err(e) => // the search was aborted, no partial results
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Search aborted: {0}")]
    Unrecoverable(String),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

impl SearchError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unrecoverable(msg: impl Into<String>) -> Self {
        Self::Unrecoverable(msg.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    /// Maps an IO error raised while touching `path` onto the matching variant
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
