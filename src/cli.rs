// src/cli.rs

//! Command-line arguments for the standalone host binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawOptions;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "wasm-pack-watch",
    version,
    about = "Rebuild a wasm-pack crate when its sources change and push a reload to connected browsers.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to an options file (TOML).
    ///
    /// Default: `wasm-pack-watch.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Crate directory to watch and build in.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Build command, split on whitespace (default: `wasm-pack build --dev`).
    #[arg(long, value_name = "CMD")]
    pub build_command: Option<String>,

    /// Quiet period before a burst of changes starts a build.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Address of the reload WebSocket endpoint.
    #[arg(long, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Start one build right away instead of waiting for the first change.
    #[arg(long)]
    pub build_on_start: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WASM_PACK_WATCH_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve options, print them with the watched globs, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Layer flags given on the command line over file/default options.
    pub fn apply_to(&self, raw: &mut RawOptions) {
        if let Some(cwd) = &self.cwd {
            raw.cwd = Some(cwd.clone());
        }
        if let Some(cmd) = &self.build_command {
            raw.build_command = Some(cmd.clone());
        }
        if let Some(ms) = self.debounce_ms {
            raw.debounce_ms = ms;
        }
        if let Some(addr) = &self.addr {
            raw.server.addr = addr.clone();
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
