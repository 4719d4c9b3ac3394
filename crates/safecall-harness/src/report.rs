//! Conformance report generation.

use serde::Serialize;
use std::fmt::Write as _;

use crate::checks::{CheckOutcome, CheckResult};
use crate::structured_log::now_utc;

/// Machine-readable summary of a conformance run.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub generated_utc: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<CheckResult>,
}

impl ConformanceReport {
    #[must_use]
    pub fn from_results(results: Vec<CheckResult>) -> Self {
        let count = |o: CheckOutcome| results.iter().filter(|r| r.outcome == o).count();
        Self {
            generated_utc: now_utc(),
            total: results.len(),
            passed: count(CheckOutcome::Pass),
            failed: count(CheckOutcome::Fail),
            skipped: count(CheckOutcome::Skip),
            results,
        }
    }

    /// True when no check failed (skips are acceptable).
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render a human-readable markdown report.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Conformance report");
        let _ = writeln!(out);
        let _ = writeln!(out, "Generated: {}", self.generated_utc);
        let _ = writeln!(
            out,
            "Checks: {} total, {} passed, {} failed, {} skipped",
            self.total, self.passed, self.failed, self.skipped
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "| Check | Domain | Operation | Outcome | Detail |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for r in &self.results {
            let outcome = match r.outcome {
                CheckOutcome::Pass => "pass",
                CheckOutcome::Fail => "FAIL",
                CheckOutcome::Skip => "skip",
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                r.name,
                r.domain,
                r.operation,
                outcome,
                r.detail.as_deref().unwrap_or("")
            );
        }
        out
    }
}
