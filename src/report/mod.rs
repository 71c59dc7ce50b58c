pub mod junit;

pub use junit::{CLASS_NAME, JUnitReport, PASS_RESULT, ReportError, ReportResult, SUITE_NAME};
