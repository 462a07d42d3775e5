use std::sync::{Arc, Mutex};

use wasm_pack_watch::build::{BuildExecutor, BuildJob};
use wasm_pack_watch::errors::{Result, WatchError};
use wasm_pack_watch::types::BuildId;

#[derive(Debug, Default)]
struct LogInner {
    spawned: Vec<BuildJob>,
    terminated: Vec<BuildId>,
}

/// Shared record of what a [`FakeExecutor`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct ExecutorLog {
    inner: Arc<Mutex<LogInner>>,
}

impl ExecutorLog {
    pub fn spawned(&self) -> Vec<BuildJob> {
        self.inner.lock().unwrap().spawned.clone()
    }

    pub fn terminated(&self) -> Vec<BuildId> {
        self.inner.lock().unwrap().terminated.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.inner.lock().unwrap().spawned.len()
    }

    pub fn last_spawned(&self) -> Option<BuildJob> {
        self.inner.lock().unwrap().spawned.last().cloned()
    }
}

/// Executor that starts nothing.
///
/// It records spawn and terminate calls; the test decides when and how each
/// build exits by sending `TriggerEvent::BuildExited` itself.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    log: ExecutorLog,
    fail_spawns: bool,
}

impl FakeExecutor {
    pub fn new(log: ExecutorLog) -> Self {
        Self {
            log,
            fail_spawns: false,
        }
    }

    pub fn log(&self) -> ExecutorLog {
        self.log.clone()
    }

    /// Every `spawn_build` fails, as if the executable were missing.
    pub fn failing(log: ExecutorLog) -> Self {
        Self {
            log,
            fail_spawns: true,
        }
    }
}

impl BuildExecutor for FakeExecutor {
    fn spawn_build(&mut self, job: BuildJob) -> Result<()> {
        if self.fail_spawns {
            return Err(WatchError::Other(anyhow::anyhow!(
                "spawning build command '{}': not found",
                job.request
            )));
        }
        self.log.inner.lock().unwrap().spawned.push(job);
        Ok(())
    }

    fn terminate_build(&mut self, id: BuildId) {
        self.log.inner.lock().unwrap().terminated.push(id);
    }
}
