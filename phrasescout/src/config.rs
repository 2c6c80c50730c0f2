use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// How to handle invalid UTF-8 when loading corpus files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Reject the file with an encoding error
    #[default]
    FailFast,
    /// Replace invalid sequences with U+FFFD and keep going
    Lossy,
}

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.phrasescout.yaml` in the current directory
/// 3. Global `$HOME/.config/phrasescout/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Worker threads in the work-stealing pool (default: CPU cores)
/// thread_count: 8
///
/// # Lists at or below these lengths are searched sequentially.
/// # Leave unset to use half of the initial list length.
/// document_split_threshold: 4
/// phrase_split_threshold: 2
///
/// # Separator between works when a corpus is a single file
/// document_delimiter: "@"
///
/// # Directory corpora only
/// file_extensions: ["txt"]
/// ignore_patterns: ["drafts/**"]
///
/// encoding_mode: lossy
/// stats_only: false
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over config file values, see
/// [`SearchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of worker threads in the pool
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Document lists of this length or shorter are searched sequentially.
    /// `None` fixes it at half the initial document count.
    #[serde(default)]
    pub document_split_threshold: Option<usize>,

    /// Phrase lists of this length or shorter are matched sequentially.
    /// `None` fixes it at half the initial phrase count.
    #[serde(default)]
    pub phrase_split_threshold: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to only show totals instead of individual matches
    #[serde(default)]
    pub stats_only: bool,

    /// Separator between documents in a single-file corpus, matched anywhere in the text
    #[serde(default = "default_document_delimiter")]
    pub document_delimiter: String,

    /// Optional list of file extensions to include when the corpus is a directory
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Glob patterns to skip when the corpus is a directory
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// How to handle invalid UTF-8 in corpus files
    #[serde(default)]
    pub encoding_mode: EncodingMode,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_document_delimiter() -> String {
    "@".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thread_count: default_thread_count(),
            document_split_threshold: None,
            phrase_split_threshold: None,
            log_level: default_log_level(),
            stats_only: false,
            document_delimiter: default_document_delimiter(),
            file_extensions: None,
            ignore_patterns: Vec::new(),
            encoding_mode: EncodingMode::default(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("phrasescout/config.yaml")),
            Some(PathBuf::from(".phrasescout.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() || Some(path.as_path()) == config_path {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Checks values that serde accepts but the search cannot use
    pub fn validate(&self) -> SearchResult<()> {
        if self.document_split_threshold == Some(0) {
            return Err(SearchError::config_error(
                "document_split_threshold must be at least 1",
            ));
        }
        if self.phrase_split_threshold == Some(0) {
            return Err(SearchError::config_error(
                "phrase_split_threshold must be at least 1",
            ));
        }
        if self.document_delimiter.trim().is_empty() {
            return Err(SearchError::config_error(
                "document_delimiter must not be blank",
            ));
        }
        Ok(())
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.document_split_threshold.is_some() {
            self.document_split_threshold = cli_config.document_split_threshold;
        }
        if cli_config.phrase_split_threshold.is_some() {
            self.phrase_split_threshold = cli_config.phrase_split_threshold;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        if cli_config.stats_only {
            self.stats_only = true;
        }
        if cli_config.document_delimiter != default_document_delimiter() {
            self.document_delimiter = cli_config.document_delimiter;
        }
        if cli_config.file_extensions.is_some() {
            self.file_extensions = cli_config.file_extensions;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if cli_config.encoding_mode != EncodingMode::default() {
            self.encoding_mode = cli_config.encoding_mode;
        }
        self
    }
}
