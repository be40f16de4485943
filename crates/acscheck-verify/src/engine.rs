//! Persisted-state verifier.
//!
//! `StateShapeVerifier` implements the `StateVerifier` trait from
//! `acscheck-core`. Verification runs in two phases:
//!
//! 1. **Structural** — the blob is validated against `state_schema()` using
//!    the `jsonschema` crate: an object of `{checkedIds, administeredTime}`
//!    records with unique string ids and an `HH:MM:SS` or null time.
//! 2. **Catalog** — the blob is checked against the drug catalog: exactly one
//!    record per catalog drug, cleared ids drawn from that drug's checklist,
//!    and a timestamp only alongside a complete checklist.
//!
//! All failures are collected before returning so the log shows every reason
//! a blob was discarded.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use acscheck_contracts::{
    catalog::Catalog,
    error::ChecklistResult,
    verify::{VerificationFailure, VerificationReport},
};
use acscheck_core::traits::StateVerifier;

/// JSON Schema describing the persisted `AppState` shape.
pub fn state_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": {
            "type": "object",
            "required": ["checkedIds", "administeredTime"],
            "additionalProperties": false,
            "properties": {
                "checkedIds": {
                    "type": "array",
                    "items": { "type": "string" },
                    "uniqueItems": true
                },
                "administeredTime": {
                    "type": ["string", "null"],
                    "pattern": "^([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$"
                }
            }
        }
    })
}

/// The production `StateVerifier`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateShapeVerifier;

impl StateShapeVerifier {
    pub fn new() -> Self {
        Self
    }

    fn structural(blob: &Value) -> Vec<VerificationFailure> {
        match jsonschema::validator_for(&state_schema()) {
            Ok(validator) => validator
                .iter_errors(blob)
                .map(|error| VerificationFailure {
                    rule_id: "json-schema".to_string(),
                    message: format!("JSON Schema violation at {}: {}", error.instance_path, error),
                })
                .collect(),
            Err(e) => vec![VerificationFailure {
                rule_id: "json-schema".to_string(),
                message: format!("invalid JSON Schema document: {e}"),
            }],
        }
    }

    fn catalog_rules(records: &Map<String, Value>, catalog: &Catalog) -> Vec<VerificationFailure> {
        let mut failures = Vec::new();
        let mut fail = |rule_id: &str, message: String| {
            failures.push(VerificationFailure {
                rule_id: rule_id.to_string(),
                message,
            })
        };

        // ── drug-coverage / known-drug ────────────────────────────────────────
        for drug in catalog.iter() {
            if !records.contains_key(&drug.id) {
                fail("drug-coverage", format!("no record for catalog drug '{}'", drug.id));
            }
        }
        for drug_id in records.keys() {
            if catalog.get(drug_id).is_none() {
                fail("known-drug", format!("record for drug '{drug_id}' which is not in the catalog"));
            }
        }

        for (drug_id, record) in records {
            let Some(drug) = catalog.get(drug_id) else {
                continue;
            };
            let cleared: Vec<&str> = record
                .get("checkedIds")
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            // ── known-check ───────────────────────────────────────────────────
            for id in &cleared {
                if !drug.has_check(id) {
                    fail(
                        "known-check",
                        format!("drug '{drug_id}' lists check '{id}' which is not in its checklist"),
                    );
                }
            }

            // ── administered-complete ─────────────────────────────────────────
            if let Some(time) = record.get("administeredTime").and_then(Value::as_str) {
                let open: Vec<&str> = drug.check_ids().filter(|id| !cleared.contains(id)).collect();
                if !open.is_empty() {
                    fail(
                        "administered-complete",
                        format!(
                            "drug '{drug_id}' administered at {time} with open checks: {}",
                            open.join(", ")
                        ),
                    );
                }
            }
        }

        failures
    }
}

impl StateVerifier for StateShapeVerifier {
    fn verify(&self, blob: &Value, catalog: &Catalog) -> ChecklistResult<VerificationReport> {
        let mut failures = Self::structural(blob);

        // The catalog phase needs an object to walk. A non-object blob has
        // already failed structurally.
        if let Some(records) = blob.as_object() {
            failures.extend(Self::catalog_rules(records, catalog));
        }

        for failure in &failures {
            warn!(rule_id = %failure.rule_id, message = %failure.message, "persisted state rule failed");
        }

        let report = VerificationReport::from_failures(failures);
        debug!(
            passed = report.passed,
            failure_count = report.failures.len(),
            "persisted state verification complete"
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
