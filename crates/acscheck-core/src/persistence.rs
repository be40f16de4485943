//! The persistence adapter: `AppState` ⇄ durable slot.
//!
//! Load order for a persisted blob:
//!
//!   read slot → parse JSON → `StateVerifier` → typed decode → catalog conformance
//!
//! Any failure along that path is recovered by substituting a fresh state.
//! A corrupted blob must never block startup or use of the checklist, so the
//! infallible `load`/`save`/`clear` wrappers log and swallow errors. The
//! `try_*` variants expose the typed error for callers that want it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use acscheck_contracts::{
    catalog::Catalog,
    error::{ChecklistError, ChecklistResult},
    state::AppState,
};

use crate::traits::{StateSlot, StateVerifier};

/// Moves `AppState` in and out of one `StateSlot`.
pub struct PersistenceAdapter {
    slot: Box<dyn StateSlot>,
    verifier: Box<dyn StateVerifier>,
    catalog: Arc<Catalog>,
}

impl PersistenceAdapter {
    pub fn new(
        slot: Box<dyn StateSlot>,
        verifier: Box<dyn StateVerifier>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            slot,
            verifier,
            catalog,
        }
    }

    /// The catalog persisted states are checked against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The key of the underlying slot.
    pub fn key(&self) -> &str {
        self.slot.key()
    }

    /// Read and validate the persisted state.
    ///
    /// Returns `Ok(None)` when the slot is empty, `StorageRead` when it cannot
    /// be read, and `InvalidState` when the content is rejected.
    pub fn try_load(&self) -> ChecklistResult<Option<AppState>> {
        let Some(raw) = self.slot.read()? else {
            return Ok(None);
        };

        let blob: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| ChecklistError::InvalidState {
                reason: format!("slot '{}' does not hold JSON: {}", self.key(), e),
            })?;

        let report = self.verifier.verify(&blob, &self.catalog)?;
        if !report.passed {
            return Err(ChecklistError::InvalidState {
                reason: report.summary(),
            });
        }

        let state: AppState =
            serde_json::from_value(blob).map_err(|e| ChecklistError::InvalidState {
                reason: format!("slot '{}' does not hold a checklist state: {}", self.key(), e),
            })?;

        let violations = conformance_violations(&state, &self.catalog);
        if !violations.is_empty() {
            return Err(ChecklistError::InvalidState {
                reason: violations.join("; "),
            });
        }

        Ok(Some(state))
    }

    /// Load persisted state, or a fresh one if the slot is absent or unusable.
    pub fn load(&self) -> AppState {
        match self.try_load() {
            Ok(Some(state)) => {
                info!(key = %self.key(), drugs = state.drugs.len(), "restored persisted checklist state");
                state
            }
            Ok(None) => {
                debug!(key = %self.key(), "no persisted state; starting fresh");
                AppState::fresh(&self.catalog)
            }
            Err(e) => {
                warn!(key = %self.key(), error = %e, "discarding persisted state; starting fresh");
                AppState::fresh(&self.catalog)
            }
        }
    }

    /// Serialize `state` and overwrite the slot.
    pub fn try_save(&self, state: &AppState) -> ChecklistResult<()> {
        let serialized = serde_json::to_string(state).map_err(|e| ChecklistError::StorageWrite {
            reason: format!("failed to serialize checklist state: {}", e),
        })?;
        self.slot.write(&serialized)
    }

    /// Like `try_save`, but failures are logged and otherwise ignored. The
    /// in-memory state stays authoritative for the rest of the session.
    pub fn save(&self, state: &AppState) {
        match self.try_save(state) {
            Ok(()) => debug!(key = %self.key(), "checklist state saved"),
            Err(e) => warn!(key = %self.key(), error = %e, "failed to save checklist state"),
        }
    }

    /// Remove the slot.
    pub fn try_clear(&self) -> ChecklistResult<()> {
        self.slot.remove()
    }

    /// Like `try_clear`, but failures are logged and otherwise ignored.
    pub fn clear(&self) {
        match self.try_clear() {
            Ok(()) => debug!(key = %self.key(), "checklist state cleared"),
            Err(e) => warn!(key = %self.key(), error = %e, "failed to clear checklist state"),
        }
    }
}

/// Check a decoded state against the catalog.
///
/// Covers the invariants the store relies on: one record per catalog drug and
/// nothing else, cleared ids drawn from the drug's own checklist, and an
/// administered drug having every check cleared.
pub(crate) fn conformance_violations(state: &AppState, catalog: &Catalog) -> Vec<String> {
    let mut violations = Vec::new();

    for drug in catalog.iter() {
        let Some(record) = state.get(&drug.id) else {
            violations.push(format!("missing record for drug '{}'", drug.id));
            continue;
        };

        for id in &record.checked_ids {
            if !drug.has_check(id) {
                violations.push(format!("drug '{}' has unknown check '{}'", drug.id, id));
            }
        }

        if record.is_administered() && drug.check_ids().any(|id| !record.checked_ids.contains(id)) {
            violations.push(format!(
                "drug '{}' is administered with an incomplete checklist",
                drug.id
            ));
        }
    }

    for drug_id in state.drugs.keys() {
        if catalog.get(drug_id).is_none() {
            violations.push(format!("record for unknown drug '{}'", drug_id));
        }
    }

    violations
}
