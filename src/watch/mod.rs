// src/watch/mod.rs

//! Host-watcher glue for the standalone binary.
//!
//! - [`patterns`] compiles the crate's watch globs (`src/**`, `Cargo.toml`,
//!   `Cargo.lock`).
//! - [`watcher`] runs a `notify` watcher and feeds relevant changes into a
//!   [`TriggerHandle`](crate::trigger::TriggerHandle).
//!
//! Embedders with their own file watcher skip this module and call the
//! classifier and the trigger handle directly.

pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{WATCH_GLOBS, WatchSet};
pub use watcher::{WatcherHandle, spawn_watcher};
