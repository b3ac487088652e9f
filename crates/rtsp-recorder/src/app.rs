use crate::{AppResult, config::Config};

use std::sync::Arc;

use rtsp_recorder_core::{
    CaptureTool, FFMPEG_EXECUTABLE, FfmpegLauncher, GroupReport, RecorderGroup,
    SupervisorSettings, install_termination_handler,
};
use tracing::{info, instrument, warn};

/// Main application state.
///
/// Resolves the capture tool, starts one recorder unit per camera and runs
/// until every unit has ended.
pub struct App {
    pub(crate) config: Config,
    pub(crate) settings: SupervisorSettings,
}

impl App {
    /// Creates an application with default supervisor timings.
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            settings: SupervisorSettings::default(),
        }
    }

    /// Locate the capture tool. Fails before any camera starts.
    #[track_caller]
    pub(crate) fn capture_tool(&self) -> AppResult<CaptureTool> {
        let tool = match &self.config.ffmpeg_path {
            Some(path) => CaptureTool::from_path(path)?,
            None => CaptureTool::locate(FFMPEG_EXECUTABLE)?,
        };
        Ok(tool)
    }

    /// Run every configured camera until termination.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<GroupReport> {
        let tool = self.capture_tool()?;
        info!(tool = ?tool.path(), "RTSP recorder starting");

        // Installed before any unit exists so no signal goes unhandled.
        let termination = install_termination_handler();

        let mut group = RecorderGroup::new(Arc::new(FfmpegLauncher::new(tool)), self.settings);
        for camera in self.config.camera_specs() {
            group.spawn(camera);
        }

        if group.is_empty() {
            warn!("No cameras configured, nothing to record");
        }

        let report = group.run_until(termination).await;
        info!(started = report.started, ended = report.ended(), "All recorder units finished");

        Ok(report)
    }
}
