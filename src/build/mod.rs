// src/build/mod.rs

//! Build execution.
//!
//! - [`command`] turns an optional command string into a program + args.
//! - [`executor`] is the seam the trigger talks to: [`BuildExecutor`] plus
//!   the production [`ProcessExecutor`].
//! - [`process`] drives one spawned build: output forwarding, supersession
//!   and the exit report.

pub mod command;
pub mod executor;
pub mod process;

pub use command::{BuildRequest, DEFAULT_ARGS, DEFAULT_PROGRAM};
pub use executor::{BuildExecutor, BuildJob, ProcessExecutor};
