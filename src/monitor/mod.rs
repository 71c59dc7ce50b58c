pub mod client;
pub mod poll;
pub mod types;

pub use client::{HttpMonitorClient, MonitorApi};
pub use poll::{PollSettings, poll_until_complete};
pub use types::{
    IN_PROGRESS_STATUSES, MonitorError, MonitorResult, RunStatus, TriggeredRun, UNKNOWN_STATUS,
};
