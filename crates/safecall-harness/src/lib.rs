//! Conformance checking harness for safecall.
//!
//! This crate provides:
//! - Check suites: exercise each wrapper family against its contract
//!   (clean values on success, typed errors on failure, no sentinels)
//! - Structured logging: JSONL records for every check executed
//! - Report generation: human-readable + machine-readable summaries

#![forbid(unsafe_code)]

pub mod checks;
pub mod report;
pub mod structured_log;

pub use checks::{CheckOutcome, CheckResult, run_suite};
pub use report::ConformanceReport;
pub use structured_log::{LogEmitter, LogEntry, LogLevel};
