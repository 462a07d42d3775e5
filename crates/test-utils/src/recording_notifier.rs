use std::sync::{Arc, Mutex};

use wasm_pack_watch::errors::Result;
use wasm_pack_watch::reload::{ReloadEvent, ReloadNotifier};

/// Notifier that keeps every event it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<ReloadEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReloadEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ReloadNotifier for RecordingNotifier {
    fn send(&self, event: &ReloadEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
