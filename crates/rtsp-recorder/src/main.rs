//! RTSP Recorder: continuous segmented recording of network cameras.

mod app;
mod cli;
mod config;
mod error;
mod logging;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
};

use crate::{cli::Cli, config::Config};

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

/// Application entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until return so buffered file logs are flushed.
    let _log_guard = match logging::init(cli.log_format, cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(App::new(config).run()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
