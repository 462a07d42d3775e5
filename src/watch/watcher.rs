// src/watch/watcher.rs

use std::path::Path;
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::classify::ChangeClassifier;
use crate::errors::Result;
use crate::trigger::TriggerHandle;
use crate::watch::path_utils::relative_to;
use crate::watch::patterns::WatchSet;

/// Keeps the OS watcher alive. Dropping it stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the crate and call `trigger.notify(build_command)` for every
/// changed path that is inside the watch set and passes the classifier.
pub fn spawn_watcher(
    watch_set: WatchSet,
    classifier: ChangeClassifier,
    build_command: Option<String>,
    trigger: TriggerHandle,
) -> Result<WatcherHandle> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // notify calls this from its own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    eprintln!("wasm-pack-watch: file event dropped, watcher loop has stopped");
                }
            }
            Err(err) => eprintln!("wasm-pack-watch: file watch error: {err}"),
        },
        Config::default(),
    )?;

    for (dir, mode) in watch_set.watch_roots() {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "watch directory does not exist; skipping");
            continue;
        }
        watcher.watch(&dir, mode)?;
        debug!(dir = %dir.display(), ?mode, "watching");
    }

    info!(root = %watch_set.root().display(), "file watcher started");

    let watch_set = Arc::new(watch_set);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_content_change(&event.kind) {
                continue;
            }
            for path in event.paths {
                if is_relevant(&watch_set, &classifier, &path) {
                    debug!(path = %path.display(), "relevant change");
                    trigger.notify(build_command.clone()).await;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Creates, removals and data/name modifications. Access and
/// metadata-only events (mtime, chmod) are noise.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => false,
    }
}

fn is_relevant(watch_set: &WatchSet, classifier: &ChangeClassifier, path: &Path) -> bool {
    let Some(rel) = relative_to(watch_set.root(), path) else {
        debug!(path = %path.display(), "change outside the crate root");
        return false;
    };
    watch_set.matches(&rel) && classifier.is_relevant(&rel)
}
