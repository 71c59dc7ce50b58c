//! Runscope JUnit - CI glue for API monitoring runs.
//!
//! This crate provides:
//! - A blocking client for the Runscope radar trigger and run status endpoints
//! - A fixed-interval poll loop with an attempt budget
//! - JUnit XML output for CI dashboards
//! - Environment-driven configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use runscope_junit::{Config, Credential, HttpMonitorClient, run_monitor};
//!
//! let config = Config::from_env();
//! let credential = Credential::from_env().unwrap();
//! let mut client = HttpMonitorClient::new(&config.trigger_url, &credential).unwrap();
//! let summary = run_monitor(&mut client, &config).unwrap();
//! println!("{} -> {}", summary.test_name, summary.result);
//! ```

pub mod config;
pub mod monitor;
pub mod report;
pub mod runner;

// Re-export configuration
pub use config::{Config, ConfigError, ConfigResult, Credential};

// Re-export monitor client and poll loop
pub use monitor::{
    HttpMonitorClient, MonitorApi, MonitorError, MonitorResult, PollSettings, RunStatus,
    TriggeredRun, poll_until_complete,
};

// Re-export report writer
pub use report::{JUnitReport, ReportError, ReportResult};

// Re-export runner
pub use runner::{RunError, RunResult, RunSummary, run_monitor};
