use crate::{
    CameraSpec, CoreResult, RecorderError,
    capture::{CaptureLauncher, SegmentRequest},
    credentials::redact_credentials,
    supervisor::{RecorderSession, SegmentOutcome, SupervisorState},
};

use std::{panic::Location, sync::Arc, time::Duration};

use chrono::Local;
use error_location::ErrorLocation;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Wait after a termination request before the capture process is killed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Pause after a failed segment before the next attempt.
pub const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(5);

/// Timing knobs for [`SegmentSupervisor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    /// See [`DEFAULT_GRACE_PERIOD`].
    pub grace_period: Duration,
    /// See [`DEFAULT_FAILURE_BACKOFF`].
    pub failure_backoff: Duration,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
        }
    }
}

/// Per-camera recording loop.
///
/// Records back-to-back segments until its stop token is cancelled. Failed
/// segments are retried forever with a fixed backoff; only a stop request or
/// a missing capture tool ends the loop.
pub struct SegmentSupervisor {
    camera: CameraSpec,
    launcher: Arc<dyn CaptureLauncher>,
    settings: SupervisorSettings,
    session: RecorderSession,
    state_tx: watch::Sender<SupervisorState>,
}

impl SegmentSupervisor {
    /// Creates a supervisor that stops once `stop` is cancelled.
    pub fn new(
        camera: CameraSpec,
        launcher: Arc<dyn CaptureLauncher>,
        settings: SupervisorSettings,
        stop: CancellationToken,
    ) -> Self {
        let session = RecorderSession::new(camera.output_dir.clone(), stop);
        let (state_tx, _) = watch::channel(SupervisorState::Idle);

        Self {
            camera,
            launcher,
            settings,
            session,
            state_tx,
        }
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state_tx.subscribe()
    }

    /// Camera this supervisor records.
    pub fn camera(&self) -> &CameraSpec {
        &self.camera
    }

    /// Run the record loop until stopped.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::ToolUnavailable`] if the capture tool cannot
    /// be started, or [`RecorderError::OutputDirectory`] if the camera's
    /// directory cannot be created. Segment failures are never returned.
    #[instrument(skip(self), fields(camera = %self.camera.name))]
    pub async fn run(mut self) -> CoreResult<()> {
        let result = self.record_loop().await;

        if let Err(e) = &result {
            error!(error = %e, "Record loop aborted");
        }

        self.session.terminate(self.settings.grace_period).await;
        self.state_tx.send_replace(SupervisorState::Stopped);
        info!("Record loop stopped");

        result
    }

    async fn record_loop(&mut self) -> CoreResult<()> {
        self.session.ensure_output_dir().await?;

        info!(
            segment_secs = self.camera.segment_duration.as_secs(),
            source = %redact_credentials(&self.camera.source_url),
            output_dir = ?self.session.output_dir(),
            "Starting record loop"
        );

        let stop = self.session.stop_token().clone();

        while !self.session.stop_requested() {
            let segment_id = Uuid::new_v4();
            let output = self
                .camera
                .segment_path(Local::now(), self.launcher.extension());

            info!(segment_id = %segment_id, output = ?output, "Recording segment");

            let child = self.launcher.launch(&SegmentRequest {
                camera: &self.camera.name,
                source_url: &self.camera.source_url,
                output: &output,
                duration: self.camera.segment_duration,
            })?;
            self.session.attach(child);
            self.state_tx.send_replace(SupervisorState::Recording {
                output: output.clone(),
            });

            let waited = tokio::select! {
                status = self.session.wait() => status,
                _ = stop.cancelled() => None,
            };

            let Some(status) = waited else {
                info!(segment_id = %segment_id, "Stop requested while recording");
                if self.session.is_recording() {
                    let killed = self.session.terminate(self.settings.grace_period).await;
                    debug!(segment_id = %segment_id, killed, "Capture process stopped");
                }
                break;
            };
            self.state_tx.send_replace(SupervisorState::Idle);

            let outcome = match status {
                Ok(status) => SegmentOutcome::classify(status, &output),
                Err(e) => {
                    warn!(segment_id = %segment_id, error = %e, "Failed to wait for capture process");
                    SegmentOutcome::Failed { exit_code: None }
                }
            };

            match outcome {
                SegmentOutcome::Success => {
                    info!(segment_id = %segment_id, output = ?output, "Segment complete");
                }
                SegmentOutcome::UserStopped { exit_code } => {
                    info!(
                        segment_id = %segment_id,
                        exit_code,
                        "Segment saved (recording stopped by user)"
                    );
                }
                SegmentOutcome::Failed { exit_code } => {
                    let failure = RecorderError::SegmentFailed {
                        camera: self.camera.name.clone(),
                        exit_code,
                        location: ErrorLocation::from(Location::caller()),
                    };
                    error!(
                        segment_id = %segment_id,
                        exit_code,
                        error = %failure,
                        "Segment failed, no file written. Check the RTSP URL, camera power/network, and FFmpeg output above"
                    );
                }
            }

            if outcome.needs_backoff() && !self.session.stop_requested() {
                debug!(
                    backoff_ms = self.settings.failure_backoff.as_millis(),
                    "Backing off before next attempt"
                );
                tokio::select! {
                    _ = tokio::time::sleep(self.settings.failure_backoff) => {}
                    _ = stop.cancelled() => {}
                }
            }
        }

        Ok(())
    }
}
