// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::RecursiveMode;

use crate::errors::Result;

/// Globs registered for a crate, relative to its directory.
pub const WATCH_GLOBS: [&str; 3] = ["src/**", "Cargo.toml", "Cargo.lock"];

/// Compiled watch globs anchored at one crate directory.
#[derive(Clone)]
pub struct WatchSet {
    root: PathBuf,
    set: GlobSet,
}

impl fmt::Debug for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("root", &self.root)
            .field("globs", &WATCH_GLOBS)
            .finish()
    }
}

impl WatchSet {
    /// The root is canonicalized when possible so it shares a prefix with
    /// the absolute paths the OS watcher reports.
    pub fn for_crate(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);

        let mut builder = GlobSetBuilder::new();
        for pattern in WATCH_GLOBS {
            let glob =
                Glob::new(pattern).with_context(|| format!("invalid watch glob: {pattern}"))?;
            builder.add(glob);
        }

        Ok(Self {
            root,
            set: builder.build()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `rel_path` is relative to the crate root with `/` separators, e.g.
    /// `"src/lib.rs"`.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }

    /// The globs joined onto the crate root, as a host would register them.
    pub fn absolute_globs(&self) -> Vec<PathBuf> {
        WATCH_GLOBS.iter().map(|g| self.root.join(g)).collect()
    }

    /// Directories to hand to the OS watcher.
    ///
    /// `src/` recursively and the crate root on its own level only; watching
    /// the root recursively would pick up every write under `target/`.
    pub fn watch_roots(&self) -> Vec<(PathBuf, RecursiveMode)> {
        vec![
            (self.root.join("src"), RecursiveMode::Recursive),
            (self.root.clone(), RecursiveMode::NonRecursive),
        ]
    }
}
