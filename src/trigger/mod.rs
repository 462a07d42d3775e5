// src/trigger/mod.rs

//! The coalescing build trigger.
//!
//! Turns a burst of change notifications into at most one running build:
//! each notification re-arms a single debounce timer, and when the timer
//! fires the running build (if any) is terminated and a new one started.
//! Successful builds end in one reload signal.
//!
//! The state machine lives in [`core`] and is plain synchronous code. The
//! async shell in [`runtime`] owns the timer, the executor and the reload
//! channel, and feeds events into the core one at a time.

use crate::types::{BuildId, BuildOutcome};

/// Identifies one arming of the debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Inputs to the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A relevant file changed. Only the command of the latest change in a
    /// burst is used.
    ChangeDetected { command: Option<String> },
    /// The debounce timer armed as `timer` ran out.
    DebounceElapsed { timer: TimerId },
    /// A spawned build ended.
    BuildExited { id: BuildId, outcome: BuildOutcome },
    ShutdownRequested,
}

pub mod core;
pub mod handle;
pub mod runtime;

pub use self::core::{TriggerCommand, TriggerCore, TriggerStep};
pub use handle::TriggerHandle;
pub use runtime::TriggerRuntime;
