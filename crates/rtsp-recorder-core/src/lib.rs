//! RTSP Recorder Core Library
//!
//! Supervises continuous FFmpeg capture of network cameras into
//! fixed-duration segment files, one isolated supervisor per camera.
//!
//! # Example
//!
//! ```no_run
//! use rtsp_recorder_core::{
//!     CameraSpec, CaptureTool, CoreResult, FfmpegLauncher, RecorderGroup, SupervisorSettings,
//!     install_termination_handler,
//! };
//!
//! use std::{path::PathBuf, sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let tool = CaptureTool::locate("ffmpeg")?;
//!     let termination = install_termination_handler();
//!
//!     let mut group = RecorderGroup::new(
//!         Arc::new(FfmpegLauncher::new(tool)),
//!         SupervisorSettings::default(),
//!     );
//!     group.spawn(CameraSpec {
//!         name: "porch".to_string(),
//!         source_url: "rtsp://192.168.1.20/stream1".to_string(),
//!         output_dir: PathBuf::from("recordings/porch"),
//!         segment_duration: Duration::from_secs(15 * 60),
//!     });
//!
//!     let report = group.run_until(termination).await;
//!     println!("{} recorder(s) ended", report.ended());
//!     Ok(())
//! }
//! ```

mod camera;
mod capture;
mod coordinator;
mod credentials;
mod error;
mod supervisor;

pub use {
    camera::{CameraSpec, SEGMENT_TIMESTAMP_FORMAT, segment_file_name},
    capture::{
        CaptureLauncher, CaptureTool, FFMPEG_EXECUTABLE, FfmpegLauncher, SEGMENT_EXTENSION,
        SegmentRequest,
    },
    coordinator::{
        GroupReport, RecorderGroup, SHUTDOWN_SLACK, TerminationRequest,
        install_termination_handler,
    },
    credentials::{embed_credentials, redact_credentials},
    error::{FFMPEG_INSTALL_HINT, RecorderError, Result as CoreResult},
    supervisor::{
        DEFAULT_FAILURE_BACKOFF, DEFAULT_GRACE_PERIOD, EXIT_CODE_INTERRUPTED,
        EXIT_CODE_TERMINATED, SegmentOutcome, SegmentSupervisor, SupervisorSettings,
        SupervisorState, exit_code,
    },
};

#[cfg(test)]
mod tests;
