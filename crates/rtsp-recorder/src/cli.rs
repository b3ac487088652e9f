use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Continuous segmented recording of RTSP cameras through FFmpeg.
#[derive(Debug, Parser)]
#[command(name = "rtsp-recorder", version, about)]
pub struct Cli {
    /// Camera configuration file (`.json`, otherwise TOML).
    ///
    /// Defaults to `cameras.json` in the platform config directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Also write daily-rotated log files into this directory.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// One JSON object per line.
    Json,
}
