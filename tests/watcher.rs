// Real filesystem events through `notify` into a trigger with a fake
// executor.

use std::error::Error;
use std::time::Duration;

use wasm_pack_watch::classify::ChangeClassifier;
use wasm_pack_watch::watch::{WatchSet, spawn_watcher};
use wasm_pack_watch_test_utils::{TriggerHarness, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn scaffold_crate() -> Result<tempfile::TempDir, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("src"))?;
    std::fs::create_dir_all(dir.path().join("target"))?;
    std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"app\"\n")?;
    std::fs::write(dir.path().join("src/lib.rs"), "")?;
    Ok(dir)
}

async fn wait_for_builds(h: &TriggerHarness, n: usize) {
    with_timeout(async {
        while h.executor.spawn_count() < n {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
}

#[tokio::test]
async fn source_edit_triggers_a_build_with_configured_command() -> TestResult {
    init_tracing();
    let dir = scaffold_crate()?;
    let h = TriggerHarness::start(Duration::from_millis(50));

    let _watcher = spawn_watcher(
        WatchSet::for_crate(dir.path())?,
        ChangeClassifier::default(),
        Some("cargo check".to_string()),
        h.handle.clone(),
    )?;

    std::fs::write(dir.path().join("src/lib.rs"), "pub fn answer() -> u32 { 42 }\n")?;
    wait_for_builds(&h, 1).await;

    let job = h.executor.last_spawned().ok_or("no build spawned")?;
    assert_eq!(job.request.program, "cargo");
    assert_eq!(job.request.args, vec!["check"]);

    h.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn irrelevant_files_do_not_trigger() -> TestResult {
    init_tracing();
    let dir = scaffold_crate()?;
    let h = TriggerHarness::start(Duration::from_millis(50));

    let _watcher = spawn_watcher(
        WatchSet::for_crate(dir.path())?,
        ChangeClassifier::default(),
        None,
        h.handle.clone(),
    )?;

    std::fs::write(dir.path().join("README.md"), "# app\n")?;
    std::fs::write(dir.path().join("src/style.css"), "body {}\n")?;
    std::fs::write(dir.path().join("target/out.rs"), "")?;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.executor.spawn_count(), 0);

    // The watcher is still alive; a manifest edit goes through.
    std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"app2\"\n")?;
    wait_for_builds(&h, 1).await;

    let job = h.executor.last_spawned().ok_or("no build spawned")?;
    assert_eq!(job.request.program, "wasm-pack");

    h.shutdown().await;
    Ok(())
}
