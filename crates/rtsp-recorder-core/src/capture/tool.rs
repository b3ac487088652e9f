use crate::{CoreResult, RecorderError};

use std::{
    env,
    ffi::OsStr,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Default executable name of the capture tool.
pub const FFMPEG_EXECUTABLE: &str = "ffmpeg";

/// A resolved capture executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTool {
    path: PathBuf,
}

impl CaptureTool {
    /// Search every `PATH` entry for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::ToolUnavailable`] when no entry holds the executable.
    #[track_caller]
    #[instrument]
    pub fn locate(name: &str) -> CoreResult<Self> {
        let search_path = env::var_os("PATH").unwrap_or_default();
        Self::locate_in(name, &search_path)
    }

    /// Search the given `PATH`-style list for `name`.
    #[track_caller]
    pub fn locate_in(name: &str, search_path: &OsStr) -> CoreResult<Self> {
        let candidates = executable_names(name);

        for dir in env::split_paths(search_path) {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if is_executable(&path) {
                    info!(path = ?path, "Capture tool located");
                    return Ok(Self { path });
                }
            }
            debug!(dir = ?dir, tool = name, "Capture tool not in directory");
        }

        Err(RecorderError::ToolUnavailable {
            reason: format!("'{}' not found in system PATH", name),
            source: None,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Use an explicitly configured executable.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::ToolUnavailable`] when the file does not exist.
    #[track_caller]
    pub fn from_path<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();

        if !is_executable(path) {
            return Err(RecorderError::ToolUnavailable {
                reason: format!("configured capture tool {:?} is not an executable file", path),
                source: None,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn executable_names(name: &str) -> Vec<String> {
    if cfg!(windows) && Path::new(name).extension().is_none() {
        vec![format!("{}.exe", name), name.to_string()]
    } else {
        vec![name.to_string()]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
