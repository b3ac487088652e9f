use crate::{CoreResult, RecorderError, capture::CaptureTool};

use std::{
    ffi::OsString,
    panic::Location,
    path::Path,
    process::Stdio,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::process::{Child, Command};
use tracing::{debug, instrument};

/// Container written by [`FfmpegLauncher`].
pub const SEGMENT_EXTENSION: &str = "mp4";

/// Everything needed to start one capture segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRequest<'a> {
    /// Camera the segment belongs to.
    pub camera: &'a str,
    /// Stream source, credentials already embedded.
    pub source_url: &'a str,
    /// Destination file. Its parent directory must already exist.
    pub output: &'a Path,
    /// Maximum length of the segment.
    pub duration: Duration,
}

/// Starts capture subprocesses.
///
/// Implementations must not block: `launch` returns as soon as the process
/// is spawned. The supervisor owns the returned handle.
pub trait CaptureLauncher: Send + Sync {
    /// Start exactly one capture process for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::ToolUnavailable`] if the capture executable
    /// cannot be invoked.
    fn launch(&self, request: &SegmentRequest<'_>) -> CoreResult<Child>;

    /// File extension of the segments this launcher writes.
    fn extension(&self) -> &str {
        SEGMENT_EXTENSION
    }
}

/// Launches FFmpeg with stream copy into MP4 over RTSP/TCP.
#[derive(Debug, Clone)]
pub struct FfmpegLauncher {
    tool: CaptureTool,
}

impl FfmpegLauncher {
    /// Creates a launcher for a located FFmpeg executable.
    pub fn new(tool: CaptureTool) -> Self {
        Self { tool }
    }

    /// Arguments passed to FFmpeg for one segment.
    pub fn capture_args(request: &SegmentRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-rtsp_transport",
            "tcp",
            "-i",
            request.source_url,
            "-c",
            "copy",
            "-f",
            SEGMENT_EXTENSION,
            "-t",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        args.push(request.duration.as_secs().to_string().into());
        args.push("-y".into());
        args.push(request.output.as_os_str().to_os_string());
        args
    }
}

impl CaptureLauncher for FfmpegLauncher {
    #[track_caller]
    #[instrument(skip(self, request), fields(camera = request.camera, output = ?request.output))]
    fn launch(&self, request: &SegmentRequest<'_>) -> CoreResult<Child> {
        let child = Command::new(self.tool.path())
            .args(Self::capture_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderError::ToolUnavailable {
                reason: format!("failed to start {:?}", self.tool.path()),
                source: Some(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(pid = child.id(), "Capture process spawned");

        Ok(child)
    }
}
