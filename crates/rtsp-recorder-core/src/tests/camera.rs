use crate::{CameraSpec, segment_file_name};

use std::{path::PathBuf, time::Duration};

use chrono::{Local, TimeZone};

fn camera(name: &str, root: &str) -> CameraSpec {
    CameraSpec {
        name: name.to_string(),
        source_url: "rtsp://host/stream".to_string(),
        output_dir: PathBuf::from(root).join(name),
        segment_duration: Duration::from_secs(900),
    }
}

/// WHAT: Segment names carry the camera and a second-resolution timestamp
/// WHY: Operators locate footage by camera and wall-clock start time
#[test]
#[allow(clippy::unwrap_used)]
fn given_start_time_when_naming_segment_then_camera_and_timestamp_used() {
    // Given: A fixed local start time
    let started_at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();

    // When: Building the file name
    let name = segment_file_name("porch", started_at, "mp4");

    // Then: Zero-padded timestamp with underscore and dash separators
    assert_eq!(name, "porch_2024-03-07_09-05-02.mp4");
}

/// WHAT: Segments started one second apart get distinct names
/// WHY: A segment must never overwrite its predecessor
#[test]
#[allow(clippy::unwrap_used)]
fn given_consecutive_seconds_when_naming_segments_then_names_differ() {
    let first = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
    let second = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 3).unwrap();

    assert_ne!(
        segment_file_name("porch", first, "mp4"),
        segment_file_name("porch", second, "mp4")
    );
}

/// WHAT: Two cameras recording in the same second never collide
/// WHY: Each camera writes into its own subdirectory
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_cameras_same_second_when_building_paths_then_paths_differ() {
    // Given: Two cameras under the same recordings root
    let started_at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
    let porch = camera("porch", "/recordings");
    let garage = camera("garage", "/recordings");

    // When: Both start a segment at the same instant
    let porch_path = porch.segment_path(started_at, "mp4");
    let garage_path = garage.segment_path(started_at, "mp4");

    // Then: Paths live in separate directories
    assert_ne!(porch_path, garage_path);
    assert_eq!(
        porch_path,
        PathBuf::from("/recordings/porch/porch_2024-03-07_09-05-02.mp4")
    );
    assert_eq!(garage_path.parent(), Some(PathBuf::from("/recordings/garage").as_path()));
}
