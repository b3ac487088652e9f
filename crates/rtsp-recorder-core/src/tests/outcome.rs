use crate::{EXIT_CODE_INTERRUPTED, EXIT_CODE_TERMINATED, SegmentOutcome};

use std::fs;

use tempfile::tempdir;

/// WHAT: Exit code 0 is a successful segment
/// WHY: The capture tool reached its duration limit
#[test]
#[allow(clippy::unwrap_used)]
fn given_exit_zero_when_classifying_then_success() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("cam_2024-01-01_00-00-00.mp4");

    let outcome = SegmentOutcome::from_exit_code(Some(0), &output);

    assert_eq!(outcome, SegmentOutcome::Success);
    assert!(!outcome.needs_backoff());
}

/// WHAT: Exit 255 with a non-empty file is a user stop, not a failure
/// WHY: FFmpeg exits 255 on SIGINT after finalizing the file
#[test]
#[allow(clippy::unwrap_used)]
fn given_benign_code_and_written_file_when_classifying_then_user_stopped() {
    // Given: A non-empty segment file
    let dir = tempdir().unwrap();
    let output = dir.path().join("cam.mp4");
    fs::write(&output, b"ftyp").unwrap();

    // When: Classifying both benign codes
    let interrupted = SegmentOutcome::from_exit_code(Some(EXIT_CODE_INTERRUPTED), &output);
    let terminated = SegmentOutcome::from_exit_code(Some(EXIT_CODE_TERMINATED), &output);

    // Then: Neither is a failure and neither backs off
    assert_eq!(interrupted, SegmentOutcome::UserStopped { exit_code: 255 });
    assert_eq!(terminated, SegmentOutcome::UserStopped { exit_code: 143 });
    assert!(!interrupted.needs_backoff());
}

/// WHAT: Benign exit code without output is a failure and backs off
/// WHY: Nothing was recorded, so the camera is likely unreachable. Treating
/// it as a user stop would retry immediately and log nothing
#[test]
#[allow(clippy::unwrap_used)]
fn given_benign_code_and_missing_file_when_classifying_then_failed() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.mp4");
    let empty = dir.path().join("empty.mp4");
    fs::write(&empty, b"").unwrap();

    assert_eq!(
        SegmentOutcome::from_exit_code(Some(255), &missing),
        SegmentOutcome::Failed { exit_code: Some(255) }
    );
    assert_eq!(
        SegmentOutcome::from_exit_code(Some(143), &empty),
        SegmentOutcome::Failed { exit_code: Some(143) }
    );
    assert!(SegmentOutcome::from_exit_code(Some(255), &missing).needs_backoff());
}

/// WHAT: Any other non-zero exit code is a failure that backs off
/// WHY: Prevents a tight crash loop against an unreachable camera
#[test]
#[allow(clippy::unwrap_used)]
fn given_other_exit_code_when_classifying_then_failed_with_backoff() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("cam.mp4");
    fs::write(&output, b"partial").unwrap();

    let outcome = SegmentOutcome::from_exit_code(Some(1), &output);

    assert_eq!(outcome, SegmentOutcome::Failed { exit_code: Some(1) });
    assert!(outcome.needs_backoff());
    assert!(SegmentOutcome::from_exit_code(None, &output).needs_backoff());
}

/// WHAT: Death by SIGTERM maps to exit code 143
/// WHY: A terminated capture process must be recognised as benign
#[cfg(unix)]
#[test]
fn given_sigterm_status_when_deriving_exit_code_then_143() {
    use std::os::unix::process::ExitStatusExt;

    // Raw wait status: low 7 bits carry the terminating signal.
    let status = std::process::ExitStatus::from_raw(libc::SIGTERM);

    assert_eq!(crate::exit_code(status), Some(EXIT_CODE_TERMINATED));
    assert_eq!(
        crate::exit_code(std::process::ExitStatus::from_raw(1 << 8)),
        Some(1)
    );
}
