// src/classify.rs

//! Decides whether a changed path can affect the compiled artifact.
//!
//! Classification is by name only: a source file (by suffix), the crate
//! manifest, or anything mentioning the lock file. Unmatched input is simply
//! not relevant; there is no error case.

use crate::config::DEFAULT_SOURCE_SUFFIX;

pub const MANIFEST_FILE: &str = "Cargo.toml";
pub const LOCK_FILE_TOKEN: &str = "Cargo.lock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeClassifier {
    source_suffix: String,
}

impl Default for ChangeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_SUFFIX)
    }
}

impl ChangeClassifier {
    pub fn new(source_suffix: impl Into<String>) -> Self {
        Self {
            source_suffix: source_suffix.into(),
        }
    }

    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    /// True if `path` ends with the source suffix, ends with `Cargo.toml`,
    /// or contains `Cargo.lock` anywhere (so `Cargo.lock.bak` counts).
    pub fn is_relevant(&self, path: &str) -> bool {
        path.ends_with(self.source_suffix.as_str())
            || path.ends_with(MANIFEST_FILE)
            || path.contains(LOCK_FILE_TOKEN)
    }
}

/// [`ChangeClassifier::is_relevant`] with the default `.rs` suffix.
pub fn is_relevant_change(path: &str) -> bool {
    ChangeClassifier::default().is_relevant(path)
}
