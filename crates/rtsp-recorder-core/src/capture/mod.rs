mod launcher;
mod tool;

pub use {
    launcher::{CaptureLauncher, FfmpegLauncher, SEGMENT_EXTENSION, SegmentRequest},
    tool::{CaptureTool, FFMPEG_EXECUTABLE},
};
