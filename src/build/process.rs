// src/build/process.rs

//! Lifecycle of one spawned build process.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::trigger::TriggerEvent;
use crate::types::{BuildId, BuildOutcome};

#[derive(Debug, Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

/// Forward output, wait for exit or a termination request, then report the
/// outcome back to the trigger.
///
/// A termination request sends the kill signal and keeps waiting for the
/// exit in this task, so the caller never blocks on it. The exit is reported
/// either way; the trigger decides whether it still cares.
pub async fn run_build(
    id: BuildId,
    mut child: Child,
    events: mpsc::Sender<TriggerEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    forward_output(id, child.stdout.take(), OutputStream::Stdout);
    forward_output(id, child.stderr.take(), OutputStream::Stderr);

    let status = tokio::select! {
        status = child.wait() => status,
        cancel = &mut cancel_rx => {
            match cancel {
                Ok(()) => info!(build = %id, "build superseded; terminating process"),
                Err(_) => debug!(build = %id, "executor dropped; terminating process"),
            }
            if let Err(e) = child.start_kill() {
                warn!(build = %id, error = %e, "failed to signal build process");
            }
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) => BuildOutcome::from_status(status),
        Err(e) => {
            warn!(build = %id, error = %e, "failed to wait for build process");
            BuildOutcome::Failed(-1)
        }
    };

    info!(
        build = %id,
        exit_code = ?outcome.exit_code(),
        success = outcome.is_success(),
        "build process exited"
    );

    if events
        .send(TriggerEvent::BuildExited { id, outcome })
        .await
        .is_err()
    {
        debug!(build = %id, "trigger stopped; exit report dropped");
    }
}

/// Copy a child stream to our own stdout/stderr, one line at a time.
///
/// Bytes are passed through untouched (no UTF-8 decoding) and the pipe is
/// drained until EOF even if our side of the copy fails, so the build never
/// sees a closed pipe.
fn forward_output<R>(id: BuildId, reader: Option<R>, stream: OutputStream)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(reader) = reader else {
        return;
    };

    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut sink: Box<dyn AsyncWrite + Unpin + Send> = match stream {
            OutputStream::Stdout => Box::new(tokio::io::stdout()),
            OutputStream::Stderr => Box::new(tokio::io::stderr()),
        };
        let mut sink_ok = true;
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) if sink_ok => {
                    if let Err(e) = write_line(&mut sink, &line).await {
                        debug!(build = %id, ?stream, error = %e, "cannot forward build output; discarding the rest");
                        sink_ok = false;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(build = %id, ?stream, error = %e, "build output stream closed with error");
                    break;
                }
            }
        }
    });
}

async fn write_line<W>(sink: &mut W, line: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    sink.write_all(line).await?;
    sink.flush().await
}
