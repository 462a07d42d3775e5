// src/config/model.rs

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_SOURCE_SUFFIX: &str = ".rs";
pub const DEFAULT_RELOAD_ADDR: &str = "127.0.0.1:35729";

/// Options as written in `wasm-pack-watch.toml`.
///
/// ```toml
/// build_command = "wasm-pack build --dev --target web"
/// cwd = "crates/app"
/// debounce_ms = 100
/// source_suffix = ".rs"
///
/// [server]
/// addr = "127.0.0.1:35729"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    /// Overrides `wasm-pack build --dev`. Split on whitespace.
    #[serde(default)]
    pub build_command: Option<String>,

    /// Crate directory, relative to the process working directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Suffix that marks a path as a Rust source file.
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    #[serde(default)]
    pub server: ServerSection,
}

/// `[server]` section: where the standalone host serves reload events.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_reload_addr")]
    pub addr: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_source_suffix() -> String {
    DEFAULT_SOURCE_SUFFIX.to_string()
}

fn default_reload_addr() -> String {
    DEFAULT_RELOAD_ADDR.to_string()
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            build_command: None,
            cwd: None,
            debounce_ms: default_debounce_ms(),
            source_suffix: default_source_suffix(),
            server: ServerSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: default_reload_addr(),
        }
    }
}

/// Validated options. Built only through `TryFrom<RawOptions>`.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    build_command: Option<String>,
    cwd: Option<PathBuf>,
    debounce: Duration,
    source_suffix: String,
    reload_addr: SocketAddr,
}

impl PluginOptions {
    pub(crate) fn new_unchecked(
        build_command: Option<String>,
        cwd: Option<PathBuf>,
        debounce: Duration,
        source_suffix: String,
        reload_addr: SocketAddr,
    ) -> Self {
        Self {
            build_command,
            cwd,
            debounce,
            source_suffix,
            reload_addr,
        }
    }

    /// Command passed to every `notify`; `None` means the default toolchain.
    pub fn build_command(&self) -> Option<&str> {
        self.build_command.as_deref()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    pub fn reload_addr(&self) -> SocketAddr {
        self.reload_addr
    }

    /// Crate directory resolved against `base` (normally the process
    /// working directory). An absolute `cwd` is used as-is.
    pub fn resolve_cwd(&self, base: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) => base.join(cwd),
            None => base.to_path_buf(),
        }
    }
}
