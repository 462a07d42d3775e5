// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::RawOptions;
use crate::errors::Result;

pub const DEFAULT_CONFIG_FILE: &str = "wasm-pack-watch.toml";

/// Read and deserialize an options file. No semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawOptions> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawOptions = toml::from_str(&contents)?;
    Ok(raw)
}

/// Resolve the raw option layer before CLI overrides.
///
/// An explicitly given path must exist. Without one, `wasm-pack-watch.toml`
/// in the working directory is used when present, and built-in defaults
/// otherwise.
pub fn load_raw_options(explicit: Option<&Path>) -> Result<RawOptions> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        debug!(path = %default_path.display(), "loading default options file");
        return load_from_path(default_path);
    }

    Ok(RawOptions::default())
}
