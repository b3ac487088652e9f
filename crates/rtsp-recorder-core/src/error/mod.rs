use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Installation hint attached to every [`RecorderError::ToolUnavailable`].
pub const FFMPEG_INSTALL_HINT: &str = "Please install FFmpeg and add it to your PATH. \
     Download from: https://ffmpeg.org/download.html";

/// Recorder errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The capture executable could not be located or invoked.
    #[error("Capture tool unavailable: {reason}. {hint} {location}", hint = FFMPEG_INSTALL_HINT)]
    ToolUnavailable {
        /// What was attempted when the tool went missing.
        reason: String,
        /// Original OS error, when the failure came from a spawn attempt.
        #[source]
        source: Option<std::io::Error>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The per-camera output directory could not be created.
    #[error("Failed to create output directory {path:?}: {source} {location}")]
    OutputDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A capture segment exited unsuccessfully.
    ///
    /// Only ever logged; segment failures are retried by the supervisor.
    #[error("Segment failed for camera {camera} (exit code {exit_code:?}) {location}")]
    SegmentFailed {
        /// Camera whose segment failed.
        camera: String,
        /// Exit code reported by the capture process, if any.
        exit_code: Option<i32>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error while managing a capture process.
    #[error("IO error: {source} {location}")]
    Io {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
