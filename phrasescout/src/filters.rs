//! Rules deciding which files of a directory corpus become documents.
//!
//! Ignore patterns are glob patterns matched against the path relative to the
//! corpus root, with `/` as separator on every platform.
use glob::Pattern;
use std::path::Path;
use tracing::warn;

use crate::config::SearchConfig;

/// Extensions of formats that are never plain text
const NON_TEXT_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "o", "png", "jpg", "jpeg", "gif", "bmp", "ico", "pdf",
    "doc", "docx", "epub", "mobi", "zip", "tar", "gz", "7z", "rar",
];

/// Checks the extension against an optional allow-list, ignoring case
pub fn matches_extension(path: &Path, extensions: Option<&[String]>) -> bool {
    let Some(allowed) = extensions else {
        return true;
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Checks a root-relative path against the ignore globs
pub fn is_ignored(relative: &Path, ignore_patterns: &[String]) -> bool {
    let normalized = relative.to_string_lossy().replace('\\', "/");

    if normalized.split('/').any(|part| part == ".git") {
        return true;
    }

    ignore_patterns.iter().any(|pattern| match Pattern::new(pattern) {
        Ok(p) => p.matches(&normalized),
        Err(e) => {
            warn!("Skipping invalid ignore pattern '{}': {}", pattern, e);
            false
        }
    })
}

/// Checks if a file is a binary format that cannot hold a text document
pub fn is_likely_binary(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            NON_TEXT_EXTENSIONS
                .iter()
                .any(|bin| bin.eq_ignore_ascii_case(ext))
        })
}

/// Determines if a file under `root` should be loaded as a document
pub fn is_corpus_file(path: &Path, root: &Path, config: &SearchConfig) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    !is_likely_binary(path)
        && matches_extension(path, config.file_extensions.as_deref())
        && !is_ignored(relative, &config.ignore_patterns)
}
