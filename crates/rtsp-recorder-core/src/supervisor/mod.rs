mod outcome;
mod segment_supervisor;
mod session;

pub(crate) use session::RecorderSession;

pub use {
    outcome::{EXIT_CODE_INTERRUPTED, EXIT_CODE_TERMINATED, SegmentOutcome, exit_code},
    segment_supervisor::{
        DEFAULT_FAILURE_BACKOFF, DEFAULT_GRACE_PERIOD, SegmentSupervisor, SupervisorSettings,
    },
    session::SupervisorState,
};
