// src/reload/broadcast.rs

use tokio::sync::broadcast;
use tracing::debug;

use super::{ReloadEvent, ReloadNotifier};
use crate::errors::Result;

/// In-process notifier for hosts that want reload events on a channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<ReloadEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ReloadNotifier for BroadcastNotifier {
    fn send(&self, event: &ReloadEvent) -> Result<()> {
        // No subscribers is not an error: nobody is connected yet.
        match self.tx.send(event.clone()) {
            Ok(n) => debug!(receivers = n, "reload event broadcast"),
            Err(_) => debug!("no reload subscribers"),
        }
        Ok(())
    }
}
