use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Local};

/// Timestamp layout used in segment file names (second resolution).
pub const SEGMENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Resolved recording parameters for one camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSpec {
    /// Unique camera name, used for directories, file names and log tags.
    pub name: String,
    /// Stream source with credentials already embedded.
    pub source_url: String,
    /// Directory receiving this camera's segments.
    pub output_dir: PathBuf,
    /// Length of each segment.
    pub segment_duration: Duration,
}

impl CameraSpec {
    /// Path of the segment started at `started_at`.
    pub fn segment_path(&self, started_at: DateTime<Local>, extension: &str) -> PathBuf {
        self.output_dir
            .join(segment_file_name(&self.name, started_at, extension))
    }
}

/// `<camera>_<YYYY-MM-DD_HH-MM-SS>.<extension>`
pub fn segment_file_name(camera: &str, started_at: DateTime<Local>, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        camera,
        started_at.format(SEGMENT_TIMESTAMP_FORMAT),
        extension
    )
}
