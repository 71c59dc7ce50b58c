//! Monitoring API access.
//!
//! [`MonitorApi`] is the seam between the run loop and the network:
//! - [`HttpMonitorClient`] talks to the real API with a blocking reqwest client
//! - tests substitute scripted implementations

use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, info};

use super::types::{MonitorError, MonitorResult, RunStatus, TriggeredRun};
use crate::config::Credential;

/// Operations the run loop needs from the monitoring API
pub trait MonitorApi {
    /// Start a test run
    fn trigger(&mut self) -> MonitorResult<TriggeredRun>;

    /// Fetch the current status of a run
    fn fetch_status(&mut self, status_url: &str) -> MonitorResult<RunStatus>;
}

/// Blocking HTTP client for the radar trigger and run status endpoints
#[derive(Debug, Clone)]
pub struct HttpMonitorClient {
    http: Client,
    trigger_url: String,
}

impl HttpMonitorClient {
    /// Build a client that authenticates every request with `credential`.
    pub fn new(trigger_url: impl Into<String>, credential: &Credential) -> MonitorResult<Self> {
        let mut auth = HeaderValue::from_str(credential.header_value())
            .map_err(|_| MonitorError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| MonitorError::Request {
                action: "client setup",
                source,
            })?;

        Ok(Self {
            http,
            trigger_url: trigger_url.into(),
        })
    }

    pub fn trigger_url(&self) -> &str {
        &self.trigger_url
    }
}

impl MonitorApi for HttpMonitorClient {
    fn trigger(&mut self) -> MonitorResult<TriggeredRun> {
        info!(url = %self.trigger_url, "Triggering API monitoring test");

        let response = self
            .http
            .post(&self.trigger_url)
            .send()
            .map_err(|source| MonitorError::Request {
                action: "trigger",
                source,
            })?;
        let body = read_body(response, "trigger")?;

        let run = TriggeredRun::from_body(&body)?;

        info!(test_name = %run.test_name, test_id = %run.test_id, "Test triggered");
        info!(url = %run.status_url, "Polling test run");
        Ok(run)
    }

    fn fetch_status(&mut self, status_url: &str) -> MonitorResult<RunStatus> {
        let response = self
            .http
            .get(status_url)
            .send()
            .map_err(|source| MonitorError::Request {
                action: "status",
                source,
            })?;
        let body = read_body(response, "status")?;
        RunStatus::from_body(&body)
    }
}

/// Read the body, logging it, and reject non-2xx statuses.
fn read_body(response: Response, action: &'static str) -> MonitorResult<String> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|source| MonitorError::Request { action, source })?;

    debug!(action, status = status.as_u16(), %body, "Response received");

    if !status.is_success() {
        return Err(MonitorError::Status {
            action,
            status: status.as_u16(),
        });
    }
    Ok(body)
}
