use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wasm_pack_watch::reload::ReloadSlot;
use wasm_pack_watch::trigger::{TriggerCore, TriggerEvent, TriggerHandle, TriggerRuntime};
use wasm_pack_watch::types::{BuildId, BuildOutcome};

use crate::fake_executor::{ExecutorLog, FakeExecutor};
use crate::recording_notifier::RecordingNotifier;

/// A trigger runtime wired to a [`FakeExecutor`] and a
/// [`RecordingNotifier`], running on its own task.
pub struct TriggerHarness {
    pub handle: TriggerHandle,
    pub events: mpsc::Sender<TriggerEvent>,
    pub executor: ExecutorLog,
    pub reloads: RecordingNotifier,
    pub reload_slot: ReloadSlot,
    pub delay: Duration,
    join: JoinHandle<()>,
}

impl TriggerHarness {
    /// Reload notifier attached from the start.
    pub fn start(delay: Duration) -> Self {
        let reloads = RecordingNotifier::new();
        let slot = ReloadSlot::new();
        slot.set(Arc::new(reloads.clone())).unwrap();
        Self::start_with(delay, FakeExecutor::new(ExecutorLog::default()), slot, reloads)
    }

    /// No reload notifier attached; the caller may attach one later via
    /// `reload_slot`.
    pub fn start_detached(delay: Duration) -> Self {
        Self::start_with(
            delay,
            FakeExecutor::new(ExecutorLog::default()),
            ReloadSlot::new(),
            RecordingNotifier::new(),
        )
    }

    pub fn start_with(
        delay: Duration,
        executor: FakeExecutor,
        reload_slot: ReloadSlot,
        reloads: RecordingNotifier,
    ) -> Self {
        let log = executor.log();
        let (tx, rx) = mpsc::channel(64);
        let core = TriggerCore::new(delay, PathBuf::from("/work/app"));
        let runtime = TriggerRuntime::new(core, rx, executor, reload_slot.clone());
        let join = tokio::spawn(runtime.run());

        Self {
            handle: TriggerHandle::new(tx.clone()),
            events: tx,
            executor: log,
            reloads,
            reload_slot,
            delay,
            join,
        }
    }

    /// Report that build `id` exited.
    pub async fn exit(&self, id: BuildId, outcome: BuildOutcome) {
        self.events
            .send(TriggerEvent::BuildExited { id, outcome })
            .await
            .unwrap();
    }

    /// Let virtual time run past the debounce delay.
    pub async fn settle(&self) {
        tokio::time::sleep(self.delay * 2).await;
    }

    /// Let the runtime drain what is already queued without moving far in
    /// time.
    pub async fn yield_now(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    pub async fn shutdown(self) {
        self.handle.shutdown().await;
        let _ = tokio::time::timeout(Duration::from_secs(1), self.join).await;
    }
}
