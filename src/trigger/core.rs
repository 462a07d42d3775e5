// src/trigger/core.rs

//! Pure trigger state machine.
//!
//! [`TriggerCore`] consumes [`TriggerEvent`]s and answers with
//! [`TriggerCommand`]s for the async shell to carry out. It owns the two
//! single-slot resources of the trigger:
//!
//! - the pending debounce timer (at most one), with the command it carries;
//! - the id of the active build (at most one).
//!
//! No tokio, no processes, no clock: it can be driven step by step in tests.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::build::{BuildJob, BuildRequest};
use crate::reload::ReloadEvent;
use crate::trigger::{TimerId, TriggerEvent};
use crate::types::BuildId;

/// Action the shell must perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCommand {
    /// Drop whatever timer is armed and arm this one.
    ArmTimer { timer: TimerId, delay: Duration },
    /// Best-effort stop of a superseded build.
    TerminateBuild(BuildId),
    SpawnBuild(BuildJob),
    SignalReload(ReloadEvent),
}

/// Result of handling one event.
#[derive(Debug, Clone)]
pub struct TriggerStep {
    pub commands: Vec<TriggerCommand>,
    pub keep_running: bool,
}

impl TriggerStep {
    fn running(commands: Vec<TriggerCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
struct PendingTimer {
    id: TimerId,
    command: Option<String>,
}

#[derive(Debug)]
pub struct TriggerCore {
    delay: Duration,
    cwd: PathBuf,
    pending: Option<PendingTimer>,
    active: Option<BuildId>,
    next_timer: u64,
    next_build: u64,
}

impl TriggerCore {
    /// `cwd` is the working directory given to every build.
    pub fn new(delay: Duration, cwd: impl Into<PathBuf>) -> Self {
        Self {
            delay,
            cwd: cwd.into(),
            pending: None,
            active: None,
            next_timer: 0,
            next_build: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Build currently considered running, if any.
    pub fn active_build(&self) -> Option<BuildId> {
        self.active
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    pub fn step(&mut self, event: TriggerEvent) -> TriggerStep {
        match event {
            TriggerEvent::ChangeDetected { command } => self.on_change(command),
            TriggerEvent::DebounceElapsed { timer } => self.on_timer(timer),
            TriggerEvent::BuildExited { id, outcome } => {
                self.on_build_exit(id, outcome.is_success(), outcome.exit_code())
            }
            TriggerEvent::ShutdownRequested => self.on_shutdown(),
        }
    }

    fn on_change(&mut self, command: Option<String>) -> TriggerStep {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);

        if self.pending.is_some() {
            debug!(timer = id.0, "change during debounce window; restarting timer");
        }
        self.pending = Some(PendingTimer { id, command });

        TriggerStep::running(vec![TriggerCommand::ArmTimer {
            timer: id,
            delay: self.delay,
        }])
    }

    fn on_timer(&mut self, timer: TimerId) -> TriggerStep {
        let command = match self.pending.take() {
            Some(pending) if pending.id == timer => pending.command,
            other => {
                debug!(timer = timer.0, "ignoring stale debounce timer");
                self.pending = other;
                return TriggerStep::running(Vec::new());
            }
        };

        let mut commands = Vec::with_capacity(2);

        if let Some(previous) = self.active.take() {
            info!(build = %previous, "newer changes arrived; superseding running build");
            commands.push(TriggerCommand::TerminateBuild(previous));
        }

        self.next_build += 1;
        let id = BuildId(self.next_build);
        self.active = Some(id);

        commands.push(TriggerCommand::SpawnBuild(BuildJob {
            id,
            request: BuildRequest::from_command(command.as_deref()),
            cwd: self.cwd.clone(),
        }));

        TriggerStep::running(commands)
    }

    fn on_build_exit(&mut self, id: BuildId, success: bool, code: Option<i32>) -> TriggerStep {
        if self.active != Some(id) {
            debug!(build = %id, "ignoring exit of superseded build");
            return TriggerStep::running(Vec::new());
        }
        self.active = None;

        if success {
            info!(build = %id, "build succeeded; requesting full reload");
            TriggerStep::running(vec![TriggerCommand::SignalReload(ReloadEvent::full_reload())])
        } else {
            warn!(build = %id, exit_code = ?code, "build failed; not reloading");
            TriggerStep::running(Vec::new())
        }
    }

    fn on_shutdown(&mut self) -> TriggerStep {
        self.pending = None;
        let commands = self
            .active
            .take()
            .map(TriggerCommand::TerminateBuild)
            .into_iter()
            .collect();

        TriggerStep {
            commands,
            keep_running: false,
        }
    }
}
