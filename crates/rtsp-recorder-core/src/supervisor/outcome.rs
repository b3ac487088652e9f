use std::{path::Path, process::ExitStatus};

/// Exit code FFmpeg reports after a SIGINT (Ctrl+C).
pub const EXIT_CODE_INTERRUPTED: i32 = 255;
/// Exit code reported for a SIGTERM (128 + 15).
pub const EXIT_CODE_TERMINATED: i32 = 143;

/// Result of one finished capture segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The segment ran to its duration limit.
    Success,
    /// The capture tool was interrupted but committed a non-empty file.
    UserStopped {
        /// Benign exit code observed.
        exit_code: i32,
    },
    /// The segment failed and wrote nothing usable.
    Failed {
        /// Exit code, if the platform reported one.
        exit_code: Option<i32>,
    },
}

impl SegmentOutcome {
    /// Classify a finished capture process.
    pub fn classify(status: ExitStatus, output: &Path) -> Self {
        Self::from_exit_code(exit_code(status), output)
    }

    /// Classify a raw exit code.
    ///
    /// The interrupt/terminate codes only count as a user stop when the
    /// output file exists and is non-empty.
    pub fn from_exit_code(code: Option<i32>, output: &Path) -> Self {
        match code {
            Some(0) => SegmentOutcome::Success,
            Some(code @ (EXIT_CODE_INTERRUPTED | EXIT_CODE_TERMINATED))
                if has_content(output) =>
            {
                SegmentOutcome::UserStopped { exit_code: code }
            }
            exit_code => SegmentOutcome::Failed { exit_code },
        }
    }

    /// Whether the supervisor should back off before the next attempt.
    pub fn needs_backoff(&self) -> bool {
        matches!(self, SegmentOutcome::Failed { .. })
    }
}

/// Exit code of `status`, mapping death-by-signal `n` to `128 + n` on Unix.
pub fn exit_code(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        status.code().or_else(|| status.signal().map(|signal| 128 + signal))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}

fn has_content(output: &Path) -> bool {
    std::fs::metadata(output)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
