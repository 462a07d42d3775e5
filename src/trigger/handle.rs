// src/trigger/handle.rs

use tokio::sync::mpsc;
use tracing::debug;

use super::TriggerEvent;

/// Cheap, cloneable front door to a running trigger.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: mpsc::Sender<TriggerEvent>,
}

impl TriggerHandle {
    pub fn new(tx: mpsc::Sender<TriggerEvent>) -> Self {
        Self { tx }
    }

    /// Report one relevant change. Restarts the debounce window; the command
    /// of the last call in a burst is the one that gets built.
    ///
    /// Never fails. If the trigger has stopped the notification is dropped.
    pub async fn notify(&self, build_command: Option<String>) {
        let event = TriggerEvent::ChangeDetected {
            command: build_command,
        };
        if self.tx.send(event).await.is_err() {
            debug!("build trigger stopped; dropping change notification");
        }
    }

    /// Stop the trigger: the pending timer is dropped and the running build
    /// terminated.
    pub async fn shutdown(&self) {
        if self.tx.send(TriggerEvent::ShutdownRequested).await.is_err() {
            debug!("build trigger already stopped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
