use std::fmt;
use std::process::ExitStatus;

/// Generation number of a spawned build.
///
/// Every build the trigger starts gets a fresh, strictly increasing id. Exit
/// reports carry it back so the trigger can tell the build it is tracking
/// from one it already superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildId(pub u64);

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a build process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Non-zero exit code. `-1` when the process could not be spawned or
    /// waited on.
    Failed(i32),
    /// Ended by a signal, without an exit code.
    Terminated,
}

impl BuildOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return BuildOutcome::Success;
        }
        match status.code() {
            Some(code) => BuildOutcome::Failed(code),
            None => BuildOutcome::Terminated,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, BuildOutcome::Success)
    }

    pub fn exit_code(self) -> Option<i32> {
        match self {
            BuildOutcome::Success => Some(0),
            BuildOutcome::Failed(code) => Some(code),
            BuildOutcome::Terminated => None,
        }
    }
}
