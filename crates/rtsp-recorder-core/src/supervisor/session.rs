use crate::{CoreResult, RecorderError};

use std::{
    io,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::process::Child;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Observable lifecycle of a camera supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    /// No capture process running.
    Idle,
    /// A capture process is writing `output`.
    Recording {
        /// Uncommitted segment file.
        output: PathBuf,
    },
    /// Terminal: the loop has exited.
    Stopped,
}

/// Runtime state for one camera.
///
/// Owns at most one capture process at a time. The stop token only ever
/// moves from not-cancelled to cancelled.
pub struct RecorderSession {
    output_dir: PathBuf,
    dir_ready: bool,
    child: Option<Child>,
    stop: CancellationToken,
}

impl RecorderSession {
    pub(crate) fn new(output_dir: PathBuf, stop: CancellationToken) -> Self {
        Self {
            output_dir,
            dir_ready: false,
            child: None,
            stop,
        }
    }

    pub(crate) fn stop_token(&self) -> &CancellationToken {
        &self.stop
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory the first time it is needed.
    pub(crate) async fn ensure_output_dir(&mut self) -> CoreResult<()> {
        if self.dir_ready {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| RecorderError::OutputDirectory {
                path: self.output_dir.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(output_dir = ?self.output_dir, "Output directory ready");
        self.dir_ready = true;

        Ok(())
    }

    pub(crate) fn attach(&mut self, child: Child) {
        self.child = Some(child);
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.child.is_some()
    }

    /// Wait for the running capture process to exit on its own.
    ///
    /// Returns `None` when no process is attached. The handle is kept until
    /// the process has been reaped.
    pub(crate) async fn wait(&mut self) -> Option<io::Result<std::process::ExitStatus>> {
        let child = self.child.as_mut()?;
        let status = child.wait().await;
        self.child = None;
        Some(status)
    }

    /// Ask the capture process to finish, escalating to a kill after `grace`.
    ///
    /// Returns `true` if the process had to be killed.
    pub(crate) async fn terminate(&mut self, grace: Duration) -> bool {
        let Some(mut child) = self.child.take() else {
            return false;
        };

        if let Err(e) = request_termination(&mut child) {
            warn!(error = %e, "Failed to request capture process termination");
        }

        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                info!(?status, "Capture process exited after termination request");
                false
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to collect capture process exit status");
                force_kill(&mut child).await;
                true
            }
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis(),
                    "Capture process ignored termination request, killing"
                );
                force_kill(&mut child).await;
                true
            }
        }
    }
}

async fn force_kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(error = %e, "Failed to kill capture process");
    }
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> io::Result<()> {
    // Already reaped: nothing to signal.
    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = libc::pid_t::try_from(pid)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `pid` is our own child and has not been reaped yet, so the id
    // cannot have been recycled for an unrelated process.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}
