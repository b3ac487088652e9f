mod camera_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {camera_config::CameraConfig, config::Config};

pub(crate) const DEFAULT_SEGMENT_MINUTES: u64 = 15;
/// One day.
pub(crate) const MAX_SEGMENT_MINUTES: u64 = 24 * 60;
pub(crate) const DEFAULT_RECORDINGS_DIR: &str = "recordings";
pub(crate) const CONFIG_FILE_NAME: &str = "cameras.json";

pub(crate) fn default_segment_minutes() -> u64 {
    DEFAULT_SEGMENT_MINUTES
}
