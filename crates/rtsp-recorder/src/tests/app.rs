use crate::{App, AppError, config::Config};

use std::path::PathBuf;

use rtsp_recorder_core::RecorderError;

fn config_with_tool(ffmpeg_path: Option<PathBuf>) -> Config {
    Config {
        recordings_dir: PathBuf::from("/tmp/rtsp-recorder-test"),
        segment_minutes: 15,
        ffmpeg_path,
        cameras: Vec::new(),
    }
}

/// WHAT: A configured FFmpeg path that does not exist fails startup
/// WHY: The process must exit before any camera starts when the tool is missing
#[test]
fn given_missing_configured_tool_when_resolving_then_tool_unavailable() {
    // Given: A config pointing at a non-existent executable
    let app = App::new(config_with_tool(Some(PathBuf::from("/nonexistent/ffmpeg"))));

    // When: Resolving the capture tool
    let result = app.capture_tool();

    // Then: ToolUnavailable surfaces through AppError
    assert!(matches!(
        result,
        Err(AppError::Recorder {
            source: RecorderError::ToolUnavailable { .. },
            ..
        })
    ));
}

/// WHAT: Running with a missing tool returns an error instead of recording
/// WHY: Exit code 1 is derived from this error
#[tokio::test]
async fn given_missing_configured_tool_when_running_then_error_returned() {
    let app = App::new(config_with_tool(Some(PathBuf::from("/nonexistent/ffmpeg"))));

    let result = app.run().await;

    assert!(result.is_err());
}

/// WHAT: An executable tool with no cameras completes immediately
/// WHY: An empty camera list is a valid, if idle, configuration
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_tool_and_no_cameras_when_running_then_empty_report() {
    use std::os::unix::fs::PermissionsExt;

    // Given: A fake executable standing in for FFmpeg
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("ffmpeg");
    std::fs::write(&fake, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
    let app = App::new(config_with_tool(Some(fake)));

    // When: Running
    let report = app.run().await.unwrap();

    // Then: No unit started, run completed
    assert_eq!(report.started, 0);
    assert_eq!(report.ended(), 0);
}
