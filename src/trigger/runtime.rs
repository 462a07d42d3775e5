// src/trigger/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::{debug, error, info, warn};

use crate::build::BuildExecutor;
use crate::reload::{ReloadEvent, ReloadSlot};
use crate::types::BuildOutcome;

use super::core::{TriggerCommand, TriggerCore};
use super::{TimerId, TriggerEvent};

struct ArmedTimer {
    id: TimerId,
    sleep: Pin<Box<Sleep>>,
}

/// Async shell around [`TriggerCore`].
///
/// One task runs [`TriggerRuntime::run`]; it is the only owner of the timer,
/// the executor and the core, so every event is handled to completion before
/// the next one is looked at.
pub struct TriggerRuntime<E: BuildExecutor> {
    core: TriggerCore,
    event_rx: mpsc::Receiver<TriggerEvent>,
    executor: E,
    reload: ReloadSlot,
    timer: Option<ArmedTimer>,
}

impl<E: BuildExecutor> fmt::Debug for TriggerRuntime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerRuntime")
            .field("core", &self.core)
            .field("timer_armed", &self.timer.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: BuildExecutor> TriggerRuntime<E> {
    pub fn new(
        core: TriggerCore,
        event_rx: mpsc::Receiver<TriggerEvent>,
        executor: E,
        reload: ReloadSlot,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            reload,
            timer: None,
        }
    }

    /// Event loop. Returns after a shutdown request or once every sender of
    /// the event channel is gone.
    pub async fn run(mut self) {
        info!(
            debounce_ms = self.core.delay().as_millis() as u64,
            "build trigger started"
        );

        loop {
            let event = tokio::select! {
                biased;

                received = self.event_rx.recv() => match received {
                    Some(event) => event,
                    None => {
                        info!("trigger event channel closed; exiting");
                        break;
                    }
                },
                timer = wait_for_timer(&mut self.timer) => TriggerEvent::DebounceElapsed { timer },
            };

            debug!(?event, "trigger received event");

            if !self.dispatch(event) {
                info!("shutdown requested; stopping build trigger");
                break;
            }
        }

        info!("build trigger stopped");
    }

    /// Feed one event (and any follow-ups it causes) through the core.
    fn dispatch(&mut self, event: TriggerEvent) -> bool {
        let mut queue = VecDeque::from([event]);
        let mut keep_running = true;

        while let Some(event) = queue.pop_front() {
            let step = self.core.step(event);
            keep_running &= step.keep_running;

            for command in step.commands {
                if let Some(follow_up) = self.execute(command) {
                    queue.push_back(follow_up);
                }
            }
        }

        keep_running
    }

    fn execute(&mut self, command: TriggerCommand) -> Option<TriggerEvent> {
        match command {
            TriggerCommand::ArmTimer { timer, delay } => {
                self.timer = Some(ArmedTimer {
                    id: timer,
                    sleep: Box::pin(tokio::time::sleep(delay)),
                });
                None
            }
            TriggerCommand::TerminateBuild(id) => {
                self.executor.terminate_build(id);
                None
            }
            TriggerCommand::SpawnBuild(job) => {
                let id = job.id;
                match self.executor.spawn_build(job) {
                    Ok(()) => None,
                    Err(err) => {
                        error!(build = %id, error = %format_args!("{err:#}"), "failed to start build");
                        // Nothing will report this build's exit; close it out here.
                        Some(TriggerEvent::BuildExited {
                            id,
                            outcome: BuildOutcome::Failed(-1),
                        })
                    }
                }
            }
            TriggerCommand::SignalReload(event) => {
                self.signal_reload(&event);
                None
            }
        }
    }

    fn signal_reload(&self, event: &ReloadEvent) {
        let Some(notifier) = self.reload.get() else {
            debug!("no reload channel attached yet; skipping reload signal");
            return;
        };

        match notifier.send(event) {
            Ok(()) => info!(?event, "reload signal sent"),
            Err(err) => warn!(error = %format_args!("{err:#}"), "failed to send reload signal"),
        }
    }
}

/// Resolve when the armed timer runs out; never resolves while unarmed.
///
/// Cancel safe: the sleep lives in `timer`, so dropping this future (when
/// another `select!` branch wins) leaves the deadline untouched.
async fn wait_for_timer(timer: &mut Option<ArmedTimer>) -> TimerId {
    let Some(armed) = timer.as_mut() else {
        return std::future::pending().await;
    };
    armed.sleep.as_mut().await;
    let id = armed.id;
    *timer = None;
    id
}
