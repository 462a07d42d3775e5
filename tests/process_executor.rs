// Real processes; unix only since they lean on `true`, `false`, `sleep`
// and `test` being on PATH.
#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use wasm_pack_watch::build::{BuildExecutor, BuildJob, BuildRequest, ProcessExecutor};
use wasm_pack_watch::errors::WatchError;
use wasm_pack_watch::reload::{ReloadEvent, ReloadSlot};
use wasm_pack_watch::trigger::{TriggerCore, TriggerEvent, TriggerHandle, TriggerRuntime};
use wasm_pack_watch::types::{BuildId, BuildOutcome};
use wasm_pack_watch_test_utils::{RecordingNotifier, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn job(id: u64, command: &str, cwd: &Path) -> BuildJob {
    BuildJob {
        id: BuildId(id),
        request: BuildRequest::from_command(Some(command)),
        cwd: cwd.to_path_buf(),
    }
}

async fn next_exit(rx: &mut mpsc::Receiver<TriggerEvent>) -> Option<TriggerEvent> {
    with_timeout(rx.recv()).await
}

#[tokio::test]
async fn zero_exit_reports_success() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(1, "true", dir.path()))?;

    assert_eq!(
        next_exit(&mut rx).await,
        Some(TriggerEvent::BuildExited {
            id: BuildId(1),
            outcome: BuildOutcome::Success,
        })
    );
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_reports_failure_code() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(7, "false", dir.path()))?;

    assert_eq!(
        next_exit(&mut rx).await,
        Some(TriggerEvent::BuildExited {
            id: BuildId(7),
            outcome: BuildOutcome::Failed(1),
        })
    );
    Ok(())
}

#[tokio::test]
async fn non_utf8_output_is_drained_and_build_still_succeeds() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("build.sh"),
        r#"printf 'caf\377\n' >&2
i=0
while [ "$i" -lt 5000 ]; do
  echo "compiling unit $i"
  echo "warning $i" >&2
  i=$((i + 1))
done
exit 0
"#,
    )?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(1, "sh build.sh", dir.path()))?;

    assert_eq!(
        next_exit(&mut rx).await,
        Some(TriggerEvent::BuildExited {
            id: BuildId(1),
            outcome: BuildOutcome::Success,
        })
    );
    Ok(())
}

#[tokio::test]
async fn build_runs_in_the_given_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("Cargo.toml"), "[package]\n")?;
    let other = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(1, "test -f Cargo.toml", dir.path()))?;
    let here = next_exit(&mut rx).await;
    executor.spawn_build(job(2, "test -f Cargo.toml", other.path()))?;
    let elsewhere = next_exit(&mut rx).await;

    assert_eq!(
        here,
        Some(TriggerEvent::BuildExited {
            id: BuildId(1),
            outcome: BuildOutcome::Success,
        })
    );
    assert_eq!(
        elsewhere,
        Some(TriggerEvent::BuildExited {
            id: BuildId(2),
            outcome: BuildOutcome::Failed(1),
        })
    );
    Ok(())
}

#[tokio::test]
async fn terminated_build_still_reports_its_exit() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(3, "sleep 30", dir.path()))?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    executor.terminate_build(BuildId(3));

    assert_eq!(
        next_exit(&mut rx).await,
        Some(TriggerEvent::BuildExited {
            id: BuildId(3),
            outcome: BuildOutcome::Terminated,
        })
    );
    Ok(())
}

#[tokio::test]
async fn terminating_an_unknown_build_is_a_no_op() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    executor.spawn_build(job(1, "true", dir.path()))?;
    executor.terminate_build(BuildId(99));

    assert_eq!(
        next_exit(&mut rx).await,
        Some(TriggerEvent::BuildExited {
            id: BuildId(1),
            outcome: BuildOutcome::Success,
        })
    );
    Ok(())
}

#[tokio::test]
async fn missing_executable_fails_to_spawn() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let (tx, _rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    let result = executor.spawn_build(job(1, "wasm-pack-watch-no-such-tool build", dir.path()));

    match result {
        Err(WatchError::Other(err)) => {
            assert!(format!("{err:#}").contains("wasm-pack-watch-no-such-tool"));
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
    Ok(())
}

/// Trigger + real processes: the superseded `sleep` is killed, only the
/// replacement reloads.
#[tokio::test]
async fn superseded_process_never_reloads() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let reloads = RecordingNotifier::new();
    let slot = ReloadSlot::new();
    slot.set(Arc::new(reloads.clone()))?;

    let (tx, rx) = mpsc::channel(64);
    let executor = ProcessExecutor::new(tx.clone());
    let core = TriggerCore::new(Duration::from_millis(20), dir.path());
    let runtime = TriggerRuntime::new(core, rx, executor, slot);
    let join = tokio::spawn(runtime.run());
    let trigger = TriggerHandle::new(tx);

    trigger.notify(Some("sleep 30".to_string())).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    trigger.notify(Some("true".to_string())).await;

    with_timeout(async {
        while reloads.count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    // Give the killed `sleep` time to report; it must not add a reload.
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(reloads.events(), vec![ReloadEvent::full_reload()]);

    trigger.shutdown().await;
    with_timeout(join).await?;
    Ok(())
}

#[tokio::test]
async fn failing_process_does_not_reload() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let reloads = RecordingNotifier::new();
    let slot = ReloadSlot::new();
    slot.set(Arc::new(reloads.clone()))?;

    let (tx, rx) = mpsc::channel(64);
    let executor = ProcessExecutor::new(tx.clone());
    let core = TriggerCore::new(Duration::from_millis(20), dir.path());
    let runtime = TriggerRuntime::new(core, rx, executor, slot);
    let join = tokio::spawn(runtime.run());
    let trigger = TriggerHandle::new(tx);

    trigger.notify(Some("false".to_string())).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(reloads.count(), 0);

    // Still ready for the next change.
    trigger.notify(Some("true".to_string())).await;
    with_timeout(async {
        while reloads.count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert_eq!(reloads.count(), 1);

    trigger.shutdown().await;
    with_timeout(join).await?;
    Ok(())
}
