// src/config/mod.rs

//! Plugin options: TOML model, loading and validation.
//!
//! Options come from three layers, later ones winning: built-in defaults,
//! an optional `wasm-pack-watch.toml`, and CLI flags. The raw layer is
//! [`RawOptions`]; validation turns it into [`PluginOptions`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_from_path, load_raw_options};
pub use model::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_RELOAD_ADDR, DEFAULT_SOURCE_SUFFIX, PluginOptions, RawOptions,
    ServerSection,
};
