// src/build/command.rs

use std::fmt;

pub const DEFAULT_PROGRAM: &str = "wasm-pack";
pub const DEFAULT_ARGS: &[&str] = &["build", "--dev"];

/// Executable and arguments for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuildRequest {
    /// Parse a command string: the first whitespace-separated token is the
    /// executable, the rest are arguments. No quoting is understood.
    ///
    /// `None`, or a string with no tokens, yields the default
    /// `wasm-pack build --dev`.
    pub fn from_command(command: Option<&str>) -> Self {
        let mut tokens = command.into_iter().flat_map(str::split_whitespace);
        match tokens.next() {
            Some(program) => Self {
                program: program.to_string(),
                args: tokens.map(str::to_string).collect(),
            },
            None => Self::default(),
        }
    }
}

impl fmt::Display for BuildRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
