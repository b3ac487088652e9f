//! Forwards process termination signals to the recorder group.

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// A termination signal received by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationRequest {
    /// Name of the signal, e.g. `SIGINT`.
    pub signal: &'static str,
}

/// Install handlers for SIGINT/SIGTERM (Ctrl+C on non-Unix targets).
///
/// Installation failures are logged and leave the returned receiver without
/// a sender, so the group simply runs without signal interception.
pub fn install_termination_handler() -> mpsc::UnboundedReceiver<TerminationRequest> {
    let (tx, rx) = mpsc::unbounded_channel();

    match spawn_listener(tx) {
        Ok(_) => debug!("Termination signal handler installed"),
        Err(e) => warn!(
            error = %e,
            "Could not install termination signal handler, continuing without it"
        ),
    }

    rx
}

#[cfg(unix)]
fn spawn_listener(
    tx: mpsc::UnboundedSender<TerminationRequest>,
) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let request = tokio::select! {
                Some(()) = interrupt.recv() => TerminationRequest { signal: "SIGINT" },
                Some(()) = terminate.recv() => TerminationRequest { signal: "SIGTERM" },
                else => break,
            };

            if tx.send(request).is_err() {
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
fn spawn_listener(
    tx: mpsc::UnboundedSender<TerminationRequest>,
) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(TerminationRequest { signal: "CTRL_C" }).is_err() {
                break;
            }
        }
    }))
}
