//! Integration tests for JUnit report output

use std::fs;
use std::time::Duration;

use runscope_junit::report::{JUnitReport, PASS_RESULT};

#[test]
fn test_report_overwrites_previous_run() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test-results").join("runscope-result.xml");

    JUnitReport::new("Checkout flow", "fail", "https://r/1", Duration::from_secs(30))
        .write_to(&path)
        .expect("first write");
    JUnitReport::new("Checkout flow", PASS_RESULT, "https://r/2", Duration::from_secs(12))
        .write_to(&path)
        .expect("second write");

    let xml = fs::read_to_string(&path).expect("Failed to read report");
    assert!(xml.contains(r#"failures="0""#));
    assert!(xml.contains("https://r/2"));
    assert!(!xml.contains("https://r/1"));
    assert_eq!(xml.matches("<testsuite ").count(), 1);
    assert_eq!(xml.matches("<testcase ").count(), 1);
}

#[test]
fn test_report_in_existing_directory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("runscope-result.xml");

    JUnitReport::new("Health", "pass", "https://r", Duration::from_millis(1500))
        .write_to(&path)
        .expect("write");

    let xml = fs::read_to_string(&path).expect("Failed to read report");
    assert!(xml.contains(r#"time="1.500""#));
    assert!(xml.contains(r#"tests="1""#));
    assert!(xml.contains(r#"errors="0""#));
    assert!(xml.contains(r#"skipped="0""#));
}
