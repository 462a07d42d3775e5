// src/lib.rs

pub mod build;
pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod reload;
pub mod trigger;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::build::ProcessExecutor;
use crate::classify::ChangeClassifier;
use crate::cli::CliArgs;
use crate::config::{PluginOptions, load_raw_options};
use crate::reload::{ReloadServer, ReloadSlot};
use crate::trigger::{TriggerCore, TriggerEvent, TriggerHandle, TriggerRuntime};
use crate::watch::{WatchSet, spawn_watcher};

/// Capacity of the trigger's inbound event channel.
pub const TRIGGER_CHANNEL_CAPACITY: usize = 64;

/// High-level entry point used by `main.rs`.
///
/// Plays the part of the dev server host:
/// - resolves options (defaults, options file, CLI flags)
/// - starts the build trigger with the process executor
/// - starts the reload WebSocket server and attaches it to the trigger
/// - watches the crate and forwards relevant changes
/// - Ctrl-C → graceful shutdown
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_raw_options(args.config.as_deref())?;
    args.apply_to(&mut raw);
    let options = PluginOptions::try_from(raw)?;

    let base = std::env::current_dir().context("reading current directory")?;
    let cwd = options.resolve_cwd(&base);
    let watch_set = WatchSet::for_crate(&cwd)?;

    if args.dry_run {
        print_dry_run(&options, &watch_set);
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<TriggerEvent>(TRIGGER_CHANNEL_CAPACITY);
    let executor = ProcessExecutor::new(tx.clone());
    let reload = ReloadSlot::new();
    let core = TriggerCore::new(options.debounce(), watch_set.root().to_path_buf());
    let runtime = TriggerRuntime::new(core, rx, executor, reload.clone());
    let trigger = TriggerHandle::new(tx);

    // Reload capability: attached once, when the server is up.
    let server = ReloadServer::bind(options.reload_addr())?;
    info!(addr = %server.local_addr(), "browsers can connect for reload events");
    reload.set(Arc::new(server))?;

    let _watcher = spawn_watcher(
        watch_set,
        ChangeClassifier::new(options.source_suffix()),
        options.build_command().map(str::to_string),
        trigger.clone(),
    )?;

    {
        let trigger = trigger.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            trigger.shutdown().await;
        });
    }

    if args.build_on_start {
        trigger
            .notify(options.build_command().map(str::to_string))
            .await;
    }

    runtime.run().await;
    Ok(())
}

fn print_dry_run(options: &PluginOptions, watch_set: &WatchSet) {
    println!("wasm-pack-watch dry-run");
    println!("  cwd = {}", watch_set.root().display());
    println!(
        "  build = {}",
        build::BuildRequest::from_command(options.build_command())
    );
    println!("  debounce = {}ms", options.debounce().as_millis());
    println!("  source_suffix = {}", options.source_suffix());
    println!("  reload addr = ws://{}", options.reload_addr());
    println!();

    println!("watched:");
    for glob in watch_set.absolute_globs() {
        println!("  - {}", display_glob(glob));
    }

    debug!("dry-run complete (nothing started)");
}

fn display_glob(glob: PathBuf) -> String {
    glob.to_string_lossy().replace('\\', "/")
}
