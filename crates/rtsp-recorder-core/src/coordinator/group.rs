use crate::{
    CameraSpec, CoreResult,
    capture::CaptureLauncher,
    coordinator::TerminationRequest,
    supervisor::{SegmentSupervisor, SupervisorSettings, SupervisorState},
};

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinSet},
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Extra time granted beyond the grace period before units are aborted.
pub const SHUTDOWN_SLACK: Duration = Duration::from_secs(2);

/// How the recorder units of a group ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupReport {
    /// Units spawned.
    pub started: usize,
    /// Units whose loop stopped cleanly.
    pub finished: usize,
    /// Units whose loop ended with an error.
    pub failed: usize,
    /// Units that panicked.
    pub panicked: usize,
    /// Units aborted by the coordinator.
    pub aborted: usize,
}

impl GroupReport {
    /// Number of units that have ended, for any reason.
    pub fn ended(&self) -> usize {
        self.finished + self.failed + self.panicked + self.aborted
    }

    fn record(&mut self, joined: Result<(String, CoreResult<()>), JoinError>) {
        match joined {
            Ok((camera, Ok(()))) => {
                self.finished += 1;
                info!(camera = %camera, "Recorder unit finished");
            }
            Ok((camera, Err(e))) => {
                self.failed += 1;
                error!(camera = %camera, error = %e, "Recorder unit failed");
            }
            Err(e) if e.is_cancelled() => {
                self.aborted += 1;
            }
            Err(e) => {
                self.panicked += 1;
                error!(error = %e, "Recorder unit panicked");
            }
        }
    }
}

struct RecorderUnit {
    camera: String,
    stop: CancellationToken,
}

/// One isolated supervisor task per camera.
///
/// A panic in one camera's task is contained by its task boundary and only
/// reported; sibling units keep recording.
pub struct RecorderGroup {
    launcher: Arc<dyn CaptureLauncher>,
    settings: SupervisorSettings,
    units: Vec<RecorderUnit>,
    tasks: JoinSet<(String, CoreResult<()>)>,
}

impl RecorderGroup {
    /// Creates an empty group whose units share `launcher` and `settings`.
    pub fn new(launcher: Arc<dyn CaptureLauncher>, settings: SupervisorSettings) -> Self {
        Self {
            launcher,
            settings,
            units: Vec::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Start a supervisor for `camera`. Must be called inside a tokio runtime.
    pub fn spawn(&mut self, camera: CameraSpec) -> watch::Receiver<SupervisorState> {
        let stop = CancellationToken::new();
        let name = camera.name.clone();
        let supervisor = SegmentSupervisor::new(
            camera,
            Arc::clone(&self.launcher),
            self.settings,
            stop.clone(),
        );
        let state_rx = supervisor.subscribe();

        let task_name = name.clone();
        self.tasks
            .spawn(async move { (task_name, supervisor.run().await) });

        info!(camera = %name, "Started recorder unit");
        self.units.push(RecorderUnit { camera: name, stop });

        state_rx
    }

    /// Number of units spawned.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit has been spawned.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Camera names, in spawn order.
    pub fn cameras(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.camera.as_str())
    }

    /// Wait for every unit to end.
    ///
    /// The first termination request asks every unit to stop gracefully and
    /// starts a deadline of grace period plus [`SHUTDOWN_SLACK`]; units still
    /// running at the deadline, or at a second request, are aborted.
    #[instrument(skip_all, fields(units = self.units.len()))]
    pub async fn run_until(
        mut self,
        mut termination: mpsc::UnboundedReceiver<TerminationRequest>,
    ) -> GroupReport {
        let mut report = GroupReport {
            started: self.units.len(),
            ..GroupReport::default()
        };
        let mut deadline: Option<Instant> = None;
        let mut listening = true;

        info!("Recorder group running");

        loop {
            tokio::select! {
                joined = self.tasks.join_next() => match joined {
                    Some(joined) => report.record(joined),
                    None => break,
                },
                request = termination.recv(), if listening => match request {
                    None => listening = false,
                    Some(request) if deadline.is_none() => {
                        info!(signal = request.signal, "Termination requested, stopping recorder units");
                        for unit in &self.units {
                            unit.stop.cancel();
                        }
                        deadline = Some(Instant::now() + self.settings.grace_period + SHUTDOWN_SLACK);
                    }
                    Some(request) => {
                        warn!(signal = request.signal, "Repeated termination request, aborting recorder units");
                        self.abort_remaining(&mut report).await;
                        break;
                    }
                },
                _ = wait_until(deadline) => {
                    warn!("Recorder units did not stop in time, aborting");
                    self.abort_remaining(&mut report).await;
                    break;
                }
            }
        }

        info!(
            finished = report.finished,
            failed = report.failed,
            panicked = report.panicked,
            aborted = report.aborted,
            "All recorder units ended"
        );

        report
    }

    async fn abort_remaining(&mut self, report: &mut GroupReport) {
        // Dropping an aborted supervisor kills its capture process.
        self.tasks.abort_all();
        while let Some(joined) = self.tasks.join_next().await {
            report.record(joined);
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
