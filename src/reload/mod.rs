// src/reload/mod.rs

//! Reload signalling toward the dev server's clients.
//!
//! - [`ReloadEvent`] is the wire payload.
//! - [`ReloadNotifier`] is the capability that fans it out.
//! - [`ReloadSlot`] holds the notifier for the trigger: empty until the host
//!   server starts, set once, read-only afterwards.
//! - [`ReloadServer`] serves browsers over WebSocket for the standalone
//!   binary; [`BroadcastNotifier`] is for hosts embedding the library that
//!   already run their own dev server and want events on a channel.

pub mod broadcast;
pub mod server;

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WatchError};

pub use broadcast::BroadcastNotifier;
pub use server::ReloadServer;

/// Message sent to connected clients.
///
/// Serializes as `{"type":"full-reload","path":"*"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadEvent {
    FullReload { path: String },
}

impl ReloadEvent {
    /// Reload every page.
    pub fn full_reload() -> Self {
        ReloadEvent::FullReload {
            path: "*".to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Fan-out of reload events to whoever is listening.
pub trait ReloadNotifier: Send + Sync {
    fn send(&self, event: &ReloadEvent) -> Result<()>;
}

/// Set-once holder for the reload capability, shared between the host and
/// the trigger.
#[derive(Clone, Default)]
pub struct ReloadSlot {
    inner: Arc<OnceLock<Arc<dyn ReloadNotifier>>>,
}

impl fmt::Debug for ReloadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadSlot")
            .field("attached", &self.is_set())
            .finish()
    }
}

impl ReloadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the notifier. Fails if one is already attached.
    pub fn set(&self, notifier: Arc<dyn ReloadNotifier>) -> Result<()> {
        self.inner
            .set(notifier)
            .map_err(|_| WatchError::ReloadChannelAlreadySet)
    }

    pub fn get(&self) -> Option<&Arc<dyn ReloadNotifier>> {
        self.inner.get()
    }

    pub fn is_set(&self) -> bool {
        self.inner.get().is_some()
    }
}
