//! Verification report types for persisted state.
//!
//! Before a blob read from the durable slot is turned into an `AppState`,
//! the verifier inspects it and produces a `VerificationReport`. A report
//! with `passed = false` makes the loader fall back to fresh state.

use serde::{Deserialize, Serialize};

/// A single failed check against a persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Which rule failed (e.g. "json-schema", "known-check").
    pub rule_id: String,
    /// Human-readable description of the failure.
    pub message: String,
}

/// The complete result of verifying one blob. All failures are collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub passed: bool,
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// A passing report with no failures.
    pub fn pass() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    /// Build a report from collected failures; passes iff none were found.
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// All failure messages joined with "; ".
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
