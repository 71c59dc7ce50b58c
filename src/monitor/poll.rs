use std::thread;
use std::time::Duration;

use tracing::info;

use super::client::MonitorApi;
use super::types::{MonitorError, MonitorResult, RunStatus};
use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};

/// Polling cadence and budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay before each status request
    pub interval: Duration,
    /// Status requests allowed before timing out
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollSettings {
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Poll `status_url` until the run leaves `init`/`working`.
///
/// Sleeps `interval` before every request. Any request error ends the loop
/// immediately; running out of attempts yields [`MonitorError::Timeout`].
pub fn poll_until_complete<A>(
    api: &mut A,
    status_url: &str,
    settings: &PollSettings,
) -> MonitorResult<(RunStatus, u32)>
where
    A: MonitorApi + ?Sized,
{
    let mut attempts = 0;

    loop {
        if attempts >= settings.max_attempts {
            return Err(MonitorError::Timeout { attempts });
        }

        thread::sleep(settings.interval);
        let status = api.fetch_status(status_url)?;
        attempts += 1;

        info!(attempt = attempts, status = %status.result, "Current status");

        if !status.is_in_progress() {
            return Ok((status, attempts));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::types::TriggeredRun;
    use std::collections::VecDeque;

    /// Replays a fixed list of statuses, then errors.
    struct ScriptedApi {
        statuses: VecDeque<&'static str>,
        calls: Vec<String>,
    }

    impl ScriptedApi {
        fn new(statuses: &[&'static str]) -> Self {
            Self {
                statuses: statuses.iter().copied().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl MonitorApi for ScriptedApi {
        fn trigger(&mut self) -> MonitorResult<TriggeredRun> {
            unreachable!("poll loop never triggers")
        }

        fn fetch_status(&mut self, status_url: &str) -> MonitorResult<RunStatus> {
            self.calls.push(status_url.to_string());
            match self.statuses.pop_front() {
                Some(result) => Ok(RunStatus::from_value(
                    serde_json::json!({ "data": { "result": result } }),
                )),
                None => Err(MonitorError::Status {
                    action: "status",
                    status: 500,
                }),
            }
        }
    }

    fn fast(max_attempts: u32) -> PollSettings {
        PollSettings::default()
            .interval(Duration::ZERO)
            .max_attempts(max_attempts)
    }

    #[test]
    fn test_poll_stops_on_terminal_status() {
        let mut api = ScriptedApi::new(&["working", "working", "pass"]);
        let (status, attempts) = poll_until_complete(&mut api, "http://runs/1", &fast(60)).unwrap();

        assert_eq!(status.result, "pass");
        assert_eq!(attempts, 3);
        assert_eq!(api.calls.len(), 3);
        assert!(api.calls.iter().all(|url| url == "http://runs/1"));
    }

    #[test]
    fn test_poll_init_is_in_progress() {
        let mut api = ScriptedApi::new(&["init", "working", "fail"]);
        let (status, attempts) = poll_until_complete(&mut api, "u", &fast(60)).unwrap();
        assert_eq!(status.result, "fail");
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_poll_times_out() {
        let mut api = ScriptedApi::new(&["working"; 60]);
        let result = poll_until_complete(&mut api, "u", &fast(60));

        assert!(matches!(result, Err(MonitorError::Timeout { attempts: 60 })));
        assert_eq!(api.calls.len(), 60);
    }

    #[test]
    fn test_poll_zero_budget_makes_no_requests() {
        let mut api = ScriptedApi::new(&["pass"]);
        let result = poll_until_complete(&mut api, "u", &fast(0));

        assert!(matches!(result, Err(MonitorError::Timeout { attempts: 0 })));
        assert!(api.calls.is_empty());
    }

    #[test]
    fn test_poll_error_is_not_retried() {
        let mut api = ScriptedApi::new(&["working"]);
        let result = poll_until_complete(&mut api, "u", &fast(60));

        assert!(matches!(result, Err(MonitorError::Status { status: 500, .. })));
        assert_eq!(api.calls.len(), 2);
    }

    #[test]
    fn test_poll_unknown_status_is_terminal() {
        let mut api = ScriptedApi::new(&["queued"]);
        let (status, _) = poll_until_complete(&mut api, "u", &fast(60)).unwrap();
        assert_eq!(status.result, "queued");
    }
}
