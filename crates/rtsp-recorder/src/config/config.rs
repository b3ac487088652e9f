//! Configuration management for rtsp-recorder.
//!
//! Loads the camera list from a JSON or TOML file, resolves the recordings
//! directory against the file's location, and validates camera names before
//! any recorder starts.

use crate::{
    AppError, AppResult,
    config::{
        CONFIG_FILE_NAME, CameraConfig, DEFAULT_RECORDINGS_DIR, DEFAULT_SEGMENT_MINUTES,
        MAX_SEGMENT_MINUTES, default_segment_minutes,
    },
};

use std::{
    collections::HashSet,
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use rtsp_recorder_core::{CameraSpec, embed_credentials};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// On-disk document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory; each camera records into `<recordings_dir>/<name>/`.
    pub recordings_dir: PathBuf,

    /// Default segment length in minutes.
    #[serde(default = "default_segment_minutes")]
    pub segment_minutes: u64,

    /// Explicit FFmpeg executable instead of a `PATH` lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Cameras to record.
    #[serde(default)]
    pub cameras: Vec<CameraConfig>,
}

impl Config {
    /// Load configuration from `path`, or from the platform config directory.
    ///
    /// Without an explicit path a missing file is replaced by a template with
    /// no cameras. An explicit path must exist.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path()?;
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    info!("No config found, creating default");
                    Self::create_default(&config_path)?;
                    Self::load_from(&config_path)
                }
            }
        }
    }

    /// Read, parse, resolve and validate a configuration file.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut config = Self::parse(&contents, ConfigFormat::from_path(path))?;

        // Relative recordings directories live next to the config file.
        if config.recordings_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.recordings_dir = base.join(&config.recordings_dir);
        }

        config.validate()?;

        info!(
            config_path = ?path,
            cameras = config.cameras.len(),
            recordings_dir = ?config.recordings_dir,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Parse a configuration document without touching the filesystem.
    #[track_caller]
    pub(crate) fn parse(contents: &str, format: ConfigFormat) -> AppResult<Self> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", reason),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Reject configurations that would make cameras collide or never record.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if !(1..=MAX_SEGMENT_MINUTES).contains(&self.segment_minutes) {
            return Err(invalid(format!(
                "segment_minutes must be between 1 and {}",
                MAX_SEGMENT_MINUTES
            )));
        }

        let mut seen = HashSet::new();
        for camera in &self.cameras {
            let name = camera.name.trim();
            if name.is_empty() {
                return Err(invalid("camera name must not be empty".to_string()));
            }
            if name != camera.name
                || name == "."
                || name.contains("..")
                || name.contains(['/', '\\'])
            {
                return Err(invalid(format!(
                    "camera name {:?} is not a valid directory name",
                    camera.name
                )));
            }
            if !seen.insert(name) {
                return Err(invalid(format!("duplicate camera name {:?}", camera.name)));
            }
            if let Some(minutes) = camera.segment_minutes
                && !(1..=MAX_SEGMENT_MINUTES).contains(&minutes)
            {
                return Err(invalid(format!(
                    "camera {:?}: segment_minutes must be between 1 and {}",
                    camera.name, MAX_SEGMENT_MINUTES
                )));
            }
            if !camera.rtsp_url.starts_with("rtsp://") {
                warn!(camera = %camera.name, "Source URL is not rtsp://, credentials will not be embedded");
            }
        }

        Ok(())
    }

    /// Resolved recording parameters for every camera, in file order.
    pub fn camera_specs(&self) -> Vec<CameraSpec> {
        self.cameras
            .iter()
            .map(|camera| CameraSpec {
                name: camera.name.clone(),
                source_url: embed_credentials(
                    &camera.rtsp_url,
                    camera.username.as_deref(),
                    camera.password.as_deref(),
                ),
                output_dir: self.recordings_dir.join(&camera.name),
                segment_duration: Duration::from_secs(
                    camera
                        .segment_minutes
                        .unwrap_or(self.segment_minutes)
                        .saturating_mul(60),
                ),
            })
            .collect()
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let contents = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
        }
        .map_err(|reason| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", reason),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "rtsp-recorder", "RTSP-Recorder").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    #[track_caller]
    fn create_default(path: &Path) -> AppResult<()> {
        let config = Config {
            recordings_dir: PathBuf::from(DEFAULT_RECORDINGS_DIR),
            segment_minutes: DEFAULT_SEGMENT_MINUTES,
            ffmpeg_path: None,
            cameras: Vec::new(),
        };

        config.save(path)?;

        warn!(
            config_path = ?path,
            "Default config created with no cameras. Add cameras before recording."
        );

        Ok(())
    }
}
