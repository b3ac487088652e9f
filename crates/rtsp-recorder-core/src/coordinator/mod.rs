mod group;
mod signals;

pub use {
    group::{GroupReport, RecorderGroup, SHUTDOWN_SLACK},
    signals::{TerminationRequest, install_termination_handler},
};
