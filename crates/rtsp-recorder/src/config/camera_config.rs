use serde::{Deserialize, Serialize};

/// One camera entry of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Unique name, used as directory and file name prefix.
    pub name: String,

    /// RTSP source URL without credentials.
    pub rtsp_url: String,

    /// Optional RTSP username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Optional RTSP password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Per-camera override of the segment length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_minutes: Option<u64>,
}
