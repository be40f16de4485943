//! Test doubles shared by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use acscheck_contracts::{
    catalog::{Catalog, ChecklistItem, DrugDefinition},
    error::{ChecklistError, ChecklistResult},
    verify::{VerificationFailure, VerificationReport},
};

use crate::traits::{StateSlot, StateVerifier};

/// Two drugs: `alpha` (a_1, a_2, a_3) and `beta` (b_1).
pub(crate) fn sample_catalog() -> Catalog {
    let drug = |id: &str, checks: &[&str]| DrugDefinition {
        id: id.to_string(),
        name: id.to_uppercase(),
        dose_highlight: "1 tab".to_string(),
        suffix_note: String::new(),
        action_label: format!("give {id}"),
        checklist: checks
            .iter()
            .map(|c| ChecklistItem {
                id: c.to_string(),
                label: format!("no contraindication {c}"),
            })
            .collect(),
    };
    Catalog::new(vec![drug("alpha", &["a_1", "a_2", "a_3"]), drug("beta", &["b_1"])])
}

#[derive(Default)]
struct SlotInner {
    value: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
    removes: usize,
}

/// An in-memory slot whose clones share storage, with failure injection.
#[derive(Clone, Default)]
pub(crate) struct MockSlot {
    inner: Arc<Mutex<SlotInner>>,
}

impl MockSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_value(value: &str) -> Self {
        let slot = Self::new();
        slot.inner.lock().unwrap().value = Some(value.to_string());
        slot
    }

    pub(crate) fn value(&self) -> Option<String> {
        self.inner.lock().unwrap().value.clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub(crate) fn removes(&self) -> usize {
        self.inner.lock().unwrap().removes
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    /// Fail both `write` and `remove`.
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }
}

impl StateSlot for MockSlot {
    fn key(&self) -> &str {
        "test_slot_v1"
    }

    fn read(&self) -> ChecklistResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(ChecklistError::StorageRead {
                reason: "injected read failure".to_string(),
            });
        }
        Ok(inner.value.clone())
    }

    fn write(&self, value: &str) -> ChecklistResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(ChecklistError::StorageWrite {
                reason: "injected write failure".to_string(),
            });
        }
        inner.value = Some(value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&self) -> ChecklistResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(ChecklistError::StorageWrite {
                reason: "injected remove failure".to_string(),
            });
        }
        inner.value = None;
        inner.removes += 1;
        Ok(())
    }
}

/// A verifier with a fixed answer.
pub(crate) enum MockVerifier {
    Accept,
    Reject(&'static str),
}

impl StateVerifier for MockVerifier {
    fn verify(
        &self,
        _blob: &serde_json::Value,
        _catalog: &Catalog,
    ) -> ChecklistResult<VerificationReport> {
        Ok(match self {
            MockVerifier::Accept => VerificationReport::pass(),
            MockVerifier::Reject(message) => {
                VerificationReport::from_failures(vec![VerificationFailure {
                    rule_id: "mock".to_string(),
                    message: message.to_string(),
                }])
            }
        })
    }
}
