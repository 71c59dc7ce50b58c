//! Trigger, poll, and report in one pass.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::monitor::{MonitorApi, MonitorError, poll_until_complete};
use crate::report::{JUnitReport, ReportError};

/// Result type for a full run
pub type RunResult<T> = Result<T, RunError>;

/// Any failure that aborts a run before the report is written
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub test_name: String,
    pub test_id: String,

    /// Final status reported by the API
    pub result: String,

    /// Whether `result` is `pass`
    pub passed: bool,

    /// Human-facing report URL
    pub report_url: String,

    /// Seconds from trigger to final status
    pub duration_secs: f64,

    /// Status requests made
    pub polls: u32,

    /// Where the JUnit report was written
    pub report_path: PathBuf,
}

/// Trigger a run, wait for it, and write the JUnit report.
///
/// Nothing is written unless the run reaches a terminal status.
pub fn run_monitor<A>(api: &mut A, config: &Config) -> RunResult<RunSummary>
where
    A: MonitorApi + ?Sized,
{
    let started_at = Utc::now();
    let start = Instant::now();

    let run = api.trigger()?;
    let (status, polls) = poll_until_complete(api, &run.status_url, &config.poll)?;

    let duration = start.elapsed();
    info!(result = %status.result, "Final result");
    info!("Duration: {:.2} seconds", duration.as_secs_f64());

    let mut report = JUnitReport::new(&run.test_name, &status.result, &run.report_url, duration)
        .timestamp(started_at);
    if let Some(host) = hostname::get().ok().and_then(|h| h.into_string().ok()) {
        report = report.hostname(host);
    }
    report.write_to(&config.result_file)?;

    Ok(RunSummary {
        passed: report.passed(),
        test_name: run.test_name,
        test_id: run.test_id,
        result: status.result,
        report_url: run.report_url,
        duration_secs: duration.as_secs_f64(),
        polls,
        report_path: config.result_file.clone(),
    })
}
