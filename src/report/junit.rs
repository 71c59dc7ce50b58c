//! JUnit XML output.
//!
//! A run becomes a single `<testsuite>` holding one `<testcase>`. A result
//! other than [`PASS_RESULT`] adds a `<failure>` element; the remote report
//! link always goes into `<system-out>`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;
use tracing::info;

/// The only result treated as a passing test
pub const PASS_RESULT: &str = "pass";

/// Suite name used in the report
pub const SUITE_NAME: &str = "Runscope Test Suite";

/// Test case class name used in the report
pub const CLASS_NAME: &str = "Runscope";

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while producing the report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to create the output directory or write the file
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the XML document
    #[error("failed to render report XML: {0}")]
    Xml(String),
}

/// Outcome of one monitoring run, ready to serialize as JUnit XML
#[derive(Debug, Clone, PartialEq)]
pub struct JUnitReport {
    pub test_name: String,
    /// Final `data.result` value
    pub result: String,
    pub report_url: String,
    pub duration: Duration,
    /// When the run started (optional `timestamp` attribute)
    pub timestamp: Option<DateTime<Utc>>,
    /// Machine that ran the check (optional `hostname` attribute)
    pub hostname: Option<String>,
}

impl JUnitReport {
    pub fn new(
        test_name: impl Into<String>,
        result: impl Into<String>,
        report_url: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            result: result.into(),
            report_url: report_url.into(),
            duration,
            timestamp: None,
            hostname: None,
        }
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.result == PASS_RESULT
    }

    pub fn failures(&self) -> u32 {
        if self.passed() { 0 } else { 1 }
    }

    /// Seconds with millisecond precision, as JUnit consumers expect
    fn time(&self) -> String {
        format!("{:.3}", self.duration.as_secs_f64())
    }

    /// Render the document, XML declaration included.
    pub fn render(&self) -> ReportResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let time = self.time();
        let failures = self.failures().to_string();

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut suite = BytesStart::new("testsuite");
        suite.push_attribute(("name", SUITE_NAME));
        suite.push_attribute(("tests", "1"));
        suite.push_attribute(("failures", failures.as_str()));
        suite.push_attribute(("errors", "0"));
        suite.push_attribute(("skipped", "0"));
        suite.push_attribute(("time", time.as_str()));
        if let Some(timestamp) = &self.timestamp {
            let timestamp = timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();
            suite.push_attribute(("timestamp", timestamp.as_str()));
        }
        if let Some(hostname) = &self.hostname {
            suite.push_attribute(("hostname", hostname.as_str()));
        }
        write(&mut writer, Event::Start(suite))?;

        let mut case = BytesStart::new("testcase");
        case.push_attribute(("classname", CLASS_NAME));
        case.push_attribute(("name", self.test_name.as_str()));
        case.push_attribute(("time", time.as_str()));
        write(&mut writer, Event::Start(case))?;

        if !self.passed() {
            let message = format!("API Monitoring test result: {}", self.result);
            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", message.as_str()));
            write(&mut writer, Event::Empty(failure))?;
        }

        let system_out = format!("Test Report URL: {}", self.report_url);
        write(&mut writer, Event::Start(BytesStart::new("system-out")))?;
        write(&mut writer, Event::Text(BytesText::new(&system_out)))?;
        write(&mut writer, Event::End(BytesEnd::new("system-out")))?;

        write(&mut writer, Event::End(BytesEnd::new("testcase")))?;
        write(&mut writer, Event::End(BytesEnd::new("testsuite")))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| ReportError::Xml(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write the report to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> ReportResult<()> {
        let xml = self.render()?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, xml)?;

        info!(path = %path.display(), "JUnit result saved");
        Ok(())
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> ReportResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ReportError::Xml(e.to_string()))
}
