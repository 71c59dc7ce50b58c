use serde::Deserialize;
use thiserror::Error;

/// Statuses that mean the remote run has not finished yet.
pub const IN_PROGRESS_STATUSES: [&str; 2] = ["init", "working"];

/// Status reported when the poll body carries no `data.result` string.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur while talking to the monitoring API
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The request never produced a response (DNS, connect, TLS, body read)
    #[error("{action} request failed: {source}")]
    Request {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{action} request returned HTTP {status}")]
    Status { action: &'static str, status: u16 },

    /// The response body did not have the expected shape
    #[error("failed to parse {action} response: {reason}; body: {body}")]
    MalformedResponse {
        action: &'static str,
        reason: String,
        body: String,
    },

    /// The trigger succeeded but returned an empty poll URL
    #[error("no test run URL returned, cannot proceed")]
    MissingRunUrl,

    /// The run was still in progress after the attempt budget
    #[error("timed out waiting for test to complete after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The credential cannot be used as an HTTP header value
    #[error("credential is not a valid Authorization header value")]
    InvalidCredential,
}

/// Body returned by the trigger endpoint
#[derive(Debug, Deserialize)]
pub struct TriggerResponse {
    pub data: TriggerData,
}

#[derive(Debug, Deserialize)]
pub struct TriggerData {
    pub runs: Vec<TriggeredRunInfo>,
}

/// One entry of `data.runs`
#[derive(Debug, Deserialize)]
pub struct TriggeredRunInfo {
    pub api_test_run_url: String,
    pub test_name: String,
    pub test_id: String,
    pub test_run_url: String,
}

/// A run started by the trigger endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredRun {
    /// API URL polled for status
    pub status_url: String,
    /// Display name of the test
    pub test_name: String,
    /// Runscope test identifier
    pub test_id: String,
    /// Human-facing report URL
    pub report_url: String,
}

impl TriggeredRun {
    /// Parse a trigger response body. Only the first run is used.
    pub fn from_body(body: &str) -> MonitorResult<Self> {
        let malformed = |reason: String| MonitorError::MalformedResponse {
            action: "trigger",
            reason,
            body: body.to_string(),
        };

        let response: TriggerResponse =
            serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
        let run = response
            .data
            .runs
            .into_iter()
            .next()
            .ok_or_else(|| malformed("response contains no runs".to_string()))?;

        if run.api_test_run_url.is_empty() {
            return Err(MonitorError::MissingRunUrl);
        }

        Ok(Self {
            status_url: run.api_test_run_url,
            test_name: run.test_name,
            test_id: run.test_id,
            report_url: run.test_run_url,
        })
    }
}

/// Latest snapshot of a run's status
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatus {
    /// Value of `data.result`, or `unknown`
    pub result: String,
    /// Full poll response
    pub body: serde_json::Value,
}

impl RunStatus {
    pub fn from_value(body: serde_json::Value) -> Self {
        let result = body
            .pointer("/data/result")
            .and_then(|v| v.as_str())
            .unwrap_or(UNKNOWN_STATUS)
            .to_string();
        Self { result, body }
    }

    /// Parse a poll response body
    pub fn from_body(body: &str) -> MonitorResult<Self> {
        let value = serde_json::from_str(body).map_err(|e| MonitorError::MalformedResponse {
            action: "status",
            reason: e.to_string(),
            body: body.to_string(),
        })?;
        Ok(Self::from_value(value))
    }

    /// Whether the run is still `init` or `working`
    pub fn is_in_progress(&self) -> bool {
        IN_PROGRESS_STATUSES.contains(&self.result.as_str())
    }
}
