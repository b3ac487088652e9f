//! Tracing subscriber setup.

use crate::{AppError, AppResult, cli::LogFormat};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

/// Filter used when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "rtsp_recorder=info,rtsp_recorder_core=info";

/// Install the global subscriber.
///
/// With `log_dir` set, lines go to a daily-rotated file through a
/// non-blocking writer. The returned guard flushes that writer on drop and
/// must be held until the process exits.
#[track_caller]
pub(crate) fn init(format: LogFormat, log_dir: Option<&Path>) -> AppResult<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (writer, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("rtsp-recorder")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| AppError::LoggingError {
                    reason: format!("Failed to open log directory {:?}: {}", dir, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(log_dir.is_none())
        .with_writer(writer);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| AppError::LoggingError {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(guard)
}
