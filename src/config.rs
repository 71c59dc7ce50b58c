//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for runscope-junit, supporting:
//! - Environment variables for all configurable values
//! - Defaults matching the fixed CI setup (trigger URL, result file, polling budget)
//! - Builder pattern for programmatic configuration
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APICredentials` | Runscope access token (required) | - |
//! | `RUNSCOPE_TRIGGER_URL` | Radar trigger URL | see [`DEFAULT_TRIGGER_URL`] |
//! | `RUNSCOPE_RESULT_FILE` | JUnit report path | `test-results/runscope-result.xml` |
//! | `RUNSCOPE_POLL_INTERVAL` | Delay before each status poll (seconds) | `5` |
//! | `RUNSCOPE_MAX_ATTEMPTS` | Status polls before giving up | `60` |
//!
//! # Example
//!
//! ```bash
//! export APICredentials="0f3c..."
//! export RUNSCOPE_MAX_ATTEMPTS=120
//! runscope-junit --output build/junit/runscope.xml
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::monitor::PollSettings;

// ============================================================================
// Default Values
// ============================================================================

/// Default radar trigger URL
pub const DEFAULT_TRIGGER_URL: &str = "https://api.runscope.com/radar/b06d52bf-15b0-472d-a9a5-cb9fe8d630f2/trigger?runscope_environment=a1adcdc6-5a43-413a-b8ec-f4e90f0e2a01";

/// Default directory for the JUnit report
pub const DEFAULT_RESULT_DIR: &str = "test-results";

/// Default JUnit report file name
pub const DEFAULT_RESULT_FILE_NAME: &str = "runscope-result.xml";

/// Default delay before each status poll (seconds)
pub const DEFAULT_POLL_INTERVAL: u64 = 5;

/// Default number of status polls (~5 minutes at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable holding the API credential
pub const ENV_CREDENTIALS: &str = "APICredentials";

/// Environment variable for the trigger URL
pub const ENV_TRIGGER_URL: &str = "RUNSCOPE_TRIGGER_URL";

/// Environment variable for the report path
pub const ENV_RESULT_FILE: &str = "RUNSCOPE_RESULT_FILE";

/// Environment variable for the poll interval
pub const ENV_POLL_INTERVAL: &str = "RUNSCOPE_POLL_INTERVAL";

/// Environment variable for the poll attempt ceiling
pub const ENV_MAX_ATTEMPTS: &str = "RUNSCOPE_MAX_ATTEMPTS";

const BEARER_PREFIX: &str = "Bearer ";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} environment variable is not set")]
    MissingCredential { var: &'static str },
}

/// Bearer credential sent as the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    header_value: String,
}

impl Credential {
    /// Build a credential from a raw token, adding the bearer scheme if missing.
    pub fn new(token: &str) -> Self {
        let header_value = if token.to_ascii_lowercase().starts_with("bearer ") {
            token.to_string()
        } else {
            format!("{}{}", BEARER_PREFIX, token)
        };
        Self { header_value }
    }

    /// Read the credential from `APICredentials`. Empty values count as missing.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the credential through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_CREDENTIALS) {
            Some(token) if !token.is_empty() => Ok(Self::new(&token)),
            _ => Err(ConfigError::MissingCredential { var: ENV_CREDENTIALS }),
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> &str {
        &self.header_value
    }
}

// Keep the token out of logs and panic messages.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Settings for a single trigger/poll/report run
#[derive(Debug, Clone)]
pub struct Config {
    /// Radar trigger URL
    pub trigger_url: String,
    /// Where the JUnit report is written
    pub result_file: PathBuf,
    /// Polling cadence and budget
    pub poll: PollSettings,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    /// Values that fail to parse fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::defaults();
        Self {
            trigger_url: lookup(ENV_TRIGGER_URL).unwrap_or(defaults.trigger_url),
            result_file: lookup(ENV_RESULT_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.result_file),
            poll: PollSettings {
                interval: lookup(ENV_POLL_INTERVAL)
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.poll.interval),
                max_attempts: lookup(ENV_MAX_ATTEMPTS)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.poll.max_attempts),
            },
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            trigger_url: DEFAULT_TRIGGER_URL.to_string(),
            result_file: default_result_file(),
            poll: PollSettings::default(),
        }
    }

    pub fn trigger_url(mut self, url: impl Into<String>) -> Self {
        self.trigger_url = url.into();
        self
    }

    pub fn result_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_file = path.into();
        self
    }

    pub fn poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `test-results/runscope-result.xml`
pub fn default_result_file() -> PathBuf {
    PathBuf::from(DEFAULT_RESULT_DIR).join(DEFAULT_RESULT_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_adds_bearer_prefix() {
        assert_eq!(Credential::new("abc123").header_value(), "Bearer abc123");
    }

    #[test]
    fn test_credential_keeps_existing_prefix() {
        assert_eq!(Credential::new("Bearer abc123").header_value(), "Bearer abc123");
        assert_eq!(Credential::new("bearer abc123").header_value(), "bearer abc123");
    }

    #[test]
    fn test_credential_prefix_requires_space() {
        assert_eq!(Credential::new("bearerabc").header_value(), "Bearer bearerabc");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let debug = format!("{:?}", Credential::new("secret-token"));
        assert!(!debug.contains("secret-token"));
    }

    fn vars(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_credential_from_lookup() {
        let credential = Credential::from_lookup(vars(&[(ENV_CREDENTIALS, "abc123")])).unwrap();
        assert_eq!(credential.header_value(), "Bearer abc123");
    }

    #[test]
    fn test_credential_missing() {
        let result = Credential::from_lookup(vars(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential { var: ENV_CREDENTIALS })
        ));
    }

    #[test]
    fn test_credential_empty_is_missing() {
        let result = Credential::from_lookup(vars(&[(ENV_CREDENTIALS, "")]));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "APICredentials environment variable is not set");
    }

    #[test]
    fn test_config_from_lookup_reads_overrides() {
        let config = Config::from_lookup(vars(&[
            (ENV_TRIGGER_URL, "http://localhost:9000/trigger"),
            (ENV_RESULT_FILE, "build/junit.xml"),
            (ENV_POLL_INTERVAL, "2"),
            (ENV_MAX_ATTEMPTS, "10"),
        ]));

        assert_eq!(config.trigger_url, "http://localhost:9000/trigger");
        assert_eq!(config.result_file, PathBuf::from("build/junit.xml"));
        assert_eq!(config.poll.interval, Duration::from_secs(2));
        assert_eq!(config.poll.max_attempts, 10);
    }

    #[test]
    fn test_config_from_lookup_ignores_garbage_numbers() {
        let config = Config::from_lookup(vars(&[
            (ENV_POLL_INTERVAL, "five"),
            (ENV_MAX_ATTEMPTS, "-3"),
        ]));

        assert_eq!(config.poll.interval, Duration::from_secs(DEFAULT_POLL_INTERVAL));
        assert_eq!(config.poll.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.trigger_url, DEFAULT_TRIGGER_URL);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.trigger_url, DEFAULT_TRIGGER_URL);
        assert_eq!(config.result_file, PathBuf::from("test-results/runscope-result.xml"));
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert_eq!(config.poll.max_attempts, 60);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::defaults()
            .trigger_url("http://localhost:9000/trigger")
            .result_file("out/report.xml")
            .poll(PollSettings::default().max_attempts(3));

        assert_eq!(config.trigger_url, "http://localhost:9000/trigger");
        assert_eq!(config.result_file, PathBuf::from("out/report.xml"));
        assert_eq!(config.poll.max_attempts, 3);
    }
}
