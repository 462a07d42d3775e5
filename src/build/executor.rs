// src/build/executor.rs

//! Pluggable build executor.
//!
//! The trigger runtime never touches processes directly; it asks a
//! [`BuildExecutor`] to start or terminate builds. Production uses
//! [`ProcessExecutor`]; tests swap in a fake that only records calls.
//!
//! Contract for implementations: every build accepted by `spawn_build` must
//! eventually produce exactly one `TriggerEvent::BuildExited` carrying its
//! id, including builds that were terminated.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::build::command::BuildRequest;
use crate::build::process::run_build;
use crate::errors::Result;
use crate::trigger::TriggerEvent;
use crate::types::BuildId;

/// Everything needed to start one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    pub id: BuildId,
    pub request: BuildRequest,
    pub cwd: PathBuf,
}

pub trait BuildExecutor: Send {
    /// Start the build. An `Err` means nothing was started and no exit
    /// report will follow.
    fn spawn_build(&mut self, job: BuildJob) -> Result<()>;

    /// Ask a running build to stop. Best effort: returns immediately and
    /// does not wait for the process to die.
    fn terminate_build(&mut self, id: BuildId);
}

/// Cancel handle of the build this executor started last.
struct RunningBuild {
    id: BuildId,
    cancel: oneshot::Sender<()>,
}

/// Spawns builds as OS processes with `tokio::process`.
pub struct ProcessExecutor {
    events: mpsc::Sender<TriggerEvent>,
    running: Option<RunningBuild>,
}

impl ProcessExecutor {
    /// `events` is the trigger's inbound channel; exit reports go there.
    pub fn new(events: mpsc::Sender<TriggerEvent>) -> Self {
        Self {
            events,
            running: None,
        }
    }
}

impl BuildExecutor for ProcessExecutor {
    fn spawn_build(&mut self, job: BuildJob) -> Result<()> {
        info!(
            build = %job.id,
            cmd = %job.request,
            cwd = %job.cwd.display(),
            "starting build process"
        );

        let mut cmd = Command::new(&job.request.program);
        cmd.args(&job.request.args)
            .current_dir(&job.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning build command '{}'", job.request))?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        tokio::spawn(run_build(job.id, child, self.events.clone(), cancel_rx));

        // A previous entry left here belongs to a build that was already
        // told to stop or has exited; dropping its sender is harmless.
        self.running = Some(RunningBuild {
            id: job.id,
            cancel: cancel_tx,
        });
        Ok(())
    }

    fn terminate_build(&mut self, id: BuildId) {
        match self.running.take() {
            Some(running) if running.id == id => {
                if running.cancel.send(()).is_err() {
                    debug!(build = %id, "build already finished before termination request");
                }
            }
            other => {
                debug!(build = %id, "no running process for this build; nothing to terminate");
                self.running = other;
            }
        }
    }
}
