//! The checklist state store: the only place `AppState` is mutated.
//!
//! Per-drug state machine:
//!
//!   Open ──toggle──▶ Open ──record (all cleared)──▶ Administered (locked)
//!
//! Invariants the store upholds regardless of how it is called:
//!
//! - cleared ids are always drawn from the drug's own checklist
//! - an administered drug's cleared set never changes
//! - a timestamp is only written when every check is cleared
//! - the first timestamp wins; later record calls do not overwrite it
//! - there is exactly one record per catalog drug
//!
//! Every applied mutation is written through to the persistence adapter
//! before the call returns. Rejected calls change nothing and save nothing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use acscheck_contracts::{
    catalog::Catalog,
    outcome::{AdministerOutcome, ToggleOutcome},
    state::{AppState, DrugRecord},
};

use crate::{clock::format_time, persistence::PersistenceAdapter, traits::Clock};

/// Owns the in-memory `AppState` for one session.
///
/// Construct with `open`, which loads persisted state before any mutation can
/// be issued. Pass the store explicitly to whatever presents it.
pub struct ChecklistStore {
    catalog: Arc<Catalog>,
    state: AppState,
    persistence: PersistenceAdapter,
    clock: Box<dyn Clock>,
}

impl ChecklistStore {
    /// Load state through `persistence` and take ownership of it.
    pub fn open(persistence: PersistenceAdapter, clock: Box<dyn Clock>) -> Self {
        let catalog = Arc::clone(persistence.catalog());
        let state = persistence.load();
        info!(
            key = %persistence.key(),
            drugs = catalog.len(),
            administered = state.drugs.values().filter(|r| r.is_administered()).count(),
            "checklist store opened"
        );
        Self {
            catalog,
            state,
            persistence,
            clock,
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Flip whether `check_id` is cleared for `drug_id`.
    ///
    /// Rejected without effect when the drug is administered, unknown, or does
    /// not declare `check_id`.
    pub fn toggle_check(&mut self, drug_id: &str, check_id: &str) -> ToggleOutcome {
        let Some(drug) = self.catalog.get(drug_id) else {
            warn!(drug_id = %drug_id, "toggle rejected: unknown drug");
            return ToggleOutcome::UnknownDrug;
        };
        if !drug.has_check(check_id) {
            warn!(drug_id = %drug_id, check_id = %check_id, "toggle rejected: check not in checklist");
            return ToggleOutcome::UnknownCheck;
        }

        let record = self.state.drugs.entry(drug_id.to_string()).or_default();
        if let Some(time) = &record.administered_time {
            debug!(drug_id = %drug_id, check_id = %check_id, "toggle rejected: drug already administered");
            return ToggleOutcome::Locked {
                administered_time: time.clone(),
            };
        }

        let outcome = if record.checked_ids.remove(check_id) {
            ToggleOutcome::Unchecked
        } else {
            record.checked_ids.insert(check_id.to_string());
            ToggleOutcome::Checked
        };

        debug!(drug_id = %drug_id, check_id = %check_id, ?outcome, "check toggled");
        self.persistence.save(&self.state);
        outcome
    }

    /// Stamp `drug_id` as administered at the current wall-clock time.
    ///
    /// Only applies when every check is cleared and no timestamp exists yet.
    pub fn record_administration(&mut self, drug_id: &str) -> AdministerOutcome {
        let Some(drug) = self.catalog.get(drug_id) else {
            warn!(drug_id = %drug_id, "record rejected: unknown drug");
            return AdministerOutcome::UnknownDrug;
        };

        let record = self.state.drugs.entry(drug_id.to_string()).or_default();
        if let Some(time) = &record.administered_time {
            debug!(drug_id = %drug_id, time = %time, "record ignored: already administered");
            return AdministerOutcome::AlreadyAdministered { time: time.clone() };
        }

        let missing: Vec<String> = drug
            .check_ids()
            .filter(|id| !record.checked_ids.contains(*id))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            warn!(drug_id = %drug_id, missing = missing.len(), "record rejected: checklist incomplete");
            return AdministerOutcome::ChecklistIncomplete { missing };
        }

        let time = format_time(self.clock.now());
        record.administered_time = Some(time.clone());

        info!(drug_id = %drug_id, time = %time, "administration recorded");
        self.persistence.save(&self.state);
        AdministerOutcome::Recorded { time }
    }

    /// Return every drug to its fresh state and clear the durable slot.
    pub fn reset(&mut self) {
        self.state = AppState::fresh(&self.catalog);
        self.persistence.clear();
        self.persistence.save(&self.state);
        info!(key = %self.persistence.key(), "checklist reset");
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn record(&self, drug_id: &str) -> Option<&DrugRecord> {
        self.state.get(drug_id)
    }

    pub fn is_cleared(&self, drug_id: &str, check_id: &str) -> bool {
        self.record(drug_id)
            .is_some_and(|r| r.checked_ids.contains(check_id))
    }

    pub fn is_administered(&self, drug_id: &str) -> bool {
        self.record(drug_id).is_some_and(DrugRecord::is_administered)
    }

    /// Checklist ids not yet cleared, in display order. Empty for unknown drugs.
    pub fn missing_checks(&self, drug_id: &str) -> Vec<&str> {
        let Some(drug) = self.catalog.get(drug_id) else {
            return Vec::new();
        };
        drug.check_ids()
            .filter(|id| !self.is_cleared(drug_id, id))
            .collect()
    }

    /// True when every check of a known drug is cleared.
    pub fn all_cleared(&self, drug_id: &str) -> bool {
        self.catalog.get(drug_id).is_some() && self.missing_checks(drug_id).is_empty()
    }

    /// `(cleared, total)` for a known drug.
    pub fn progress(&self, drug_id: &str) -> Option<(usize, usize)> {
        let drug = self.catalog.get(drug_id)?;
        let total = drug.checklist.len();
        Some((total - self.missing_checks(drug_id).len(), total))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc};

    use chrono::NaiveTime;
    use proptest::prelude::*;

    use acscheck_contracts::{
        outcome::{AdministerOutcome, ToggleOutcome},
        state::AppState,
    };

    use super::ChecklistStore;
    use crate::{
        clock::FixedClock,
        persistence::PersistenceAdapter,
        testing::{sample_catalog, MockSlot, MockVerifier},
        traits::Clock,
    };

    /// A `Clock` handle the test keeps after the store takes ownership.
    #[derive(Clone)]
    struct SharedClock(Arc<FixedClock>);

    impl Clock for SharedClock {
        fn now(&self) -> NaiveTime {
            self.0.now()
        }
    }

    fn open_store(slot: &MockSlot) -> (ChecklistStore, SharedClock) {
        let clock = SharedClock(Arc::new(FixedClock::at(14, 5, 30).unwrap()));
        let persistence = PersistenceAdapter::new(
            Box::new(slot.clone()),
            Box::new(MockVerifier::Accept),
            Arc::new(sample_catalog()),
        );
        let store = ChecklistStore::open(persistence, Box::new(clock.clone()));
        (store, clock)
    }

    fn clear_all(store: &mut ChecklistStore, drug_id: &str) {
        let ids: Vec<String> = store.missing_checks(drug_id).into_iter().map(String::from).collect();
        for id in ids {
            assert_eq!(store.toggle_check(drug_id, &id), ToggleOutcome::Checked);
        }
    }

    // ── toggle_check ──────────────────────────────────────────────────────────

    #[test]
    fn toggle_flips_membership_and_saves() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);

        assert_eq!(store.toggle_check("alpha", "a_1"), ToggleOutcome::Checked);
        assert!(store.is_cleared("alpha", "a_1"));
        assert_eq!(slot.writes(), 1);

        assert_eq!(store.toggle_check("alpha", "a_1"), ToggleOutcome::Unchecked);
        assert!(!store.is_cleared("alpha", "a_1"));
        assert_eq!(slot.writes(), 2);
    }

    #[test]
    fn toggle_rejects_unknown_ids_without_saving() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);

        assert_eq!(store.toggle_check("gamma", "a_1"), ToggleOutcome::UnknownDrug);
        // b_1 exists, but belongs to beta.
        assert_eq!(store.toggle_check("alpha", "b_1"), ToggleOutcome::UnknownCheck);
        assert_eq!(slot.writes(), 0);
        assert!(store.state().is_pristine());
    }

    /// Scenario: once administered, toggling leaves the cleared set alone.
    #[test]
    fn toggle_after_administration_is_locked() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        clear_all(&mut store, "alpha");
        store.record_administration("alpha");
        let before = store.record("alpha").cloned();
        let writes = slot.writes();

        assert_eq!(
            store.toggle_check("alpha", "a_1"),
            ToggleOutcome::Locked {
                administered_time: "14:05:30".to_string()
            }
        );
        assert_eq!(store.record("alpha").cloned(), before);
        assert_eq!(slot.writes(), writes);
    }

    // ── record_administration ─────────────────────────────────────────────────

    /// Scenario: all checks cleared, then record at 14:05:30.
    #[test]
    fn record_after_full_checklist_stamps_time() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        clear_all(&mut store, "alpha");
        assert!(store.all_cleared("alpha"));

        let outcome = store.record_administration("alpha");
        assert_eq!(
            outcome,
            AdministerOutcome::Recorded {
                time: "14:05:30".to_string()
            }
        );
        assert!(store.is_administered("alpha"));
        assert_eq!(
            store.record("alpha").unwrap().administered_time.as_deref(),
            Some("14:05:30")
        );

        // Write-through: the slot already holds the timestamp.
        let persisted: AppState = serde_json::from_str(&slot.value().unwrap()).unwrap();
        assert_eq!(&persisted, store.state());
    }

    /// Scenario: one check still open, record is a no-op.
    #[test]
    fn record_with_open_checks_is_rejected() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        store.toggle_check("alpha", "a_1");
        store.toggle_check("alpha", "a_2");
        let writes = slot.writes();

        assert_eq!(
            store.record_administration("alpha"),
            AdministerOutcome::ChecklistIncomplete {
                missing: vec!["a_3".to_string()]
            }
        );
        assert!(!store.is_administered("alpha"));
        assert_eq!(slot.writes(), writes);
    }

    #[test]
    fn record_is_first_write_wins() {
        let slot = MockSlot::new();
        let (mut store, clock) = open_store(&slot);
        clear_all(&mut store, "beta");
        store.record_administration("beta");

        clock.0.set(NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(
            store.record_administration("beta"),
            AdministerOutcome::AlreadyAdministered {
                time: "14:05:30".to_string()
            }
        );
        assert_eq!(
            store.record("beta").unwrap().administered_time.as_deref(),
            Some("14:05:30")
        );
    }

    #[test]
    fn record_unknown_drug_is_rejected() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        assert_eq!(store.record_administration("gamma"), AdministerOutcome::UnknownDrug);
        assert!(store.record("gamma").is_none());
    }

    // ── reset ─────────────────────────────────────────────────────────────────

    /// Scenario: reset after administration reverts the drug to fresh.
    #[test]
    fn reset_restores_fresh_state_and_rewrites_slot() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        clear_all(&mut store, "alpha");
        store.record_administration("alpha");
        store.toggle_check("beta", "b_1");

        store.reset();

        assert!(store.state().is_pristine());
        assert_eq!(store.state(), &AppState::fresh(&sample_catalog()));
        assert_eq!(slot.removes(), 1);
        let persisted: AppState = serde_json::from_str(&slot.value().unwrap()).unwrap();
        assert!(persisted.is_pristine());

        // The lock is gone: the drug can be worked through again.
        assert_eq!(store.toggle_check("alpha", "a_1"), ToggleOutcome::Checked);
    }

    // ── open / persistence ────────────────────────────────────────────────────

    #[test]
    fn reopening_restores_previous_session() {
        let slot = MockSlot::new();
        {
            let (mut store, _) = open_store(&slot);
            clear_all(&mut store, "beta");
            store.record_administration("beta");
            store.toggle_check("alpha", "a_2");
        }

        let (store, _) = open_store(&slot);
        assert!(store.is_administered("beta"));
        assert!(store.is_cleared("alpha", "a_2"));
        assert_eq!(store.progress("alpha"), Some((1, 3)));
    }

    #[test]
    fn corrupted_slot_opens_fresh() {
        let slot = MockSlot::with_value("<<not json>>");
        let (store, _) = open_store(&slot);
        assert_eq!(store.state(), &AppState::fresh(&sample_catalog()));
    }

    /// Persistence failures never interrupt the session.
    #[test]
    fn failing_slot_keeps_in_memory_state() {
        let slot = MockSlot::new();
        slot.fail_writes(true);
        let (mut store, _) = open_store(&slot);

        clear_all(&mut store, "beta");
        assert!(store.record_administration("beta").is_applied());
        store.reset();
        assert!(store.state().is_pristine());
        assert!(slot.value().is_none());
    }

    #[test]
    fn progress_and_missing_checks() {
        let slot = MockSlot::new();
        let (mut store, _) = open_store(&slot);
        store.toggle_check("alpha", "a_2");

        assert_eq!(store.progress("alpha"), Some((1, 3)));
        assert_eq!(store.missing_checks("alpha"), vec!["a_1", "a_3"]);
        assert_eq!(store.progress("gamma"), None);
        assert!(store.missing_checks("gamma").is_empty());
        assert!(!store.all_cleared("gamma"));
    }

    // ── Reachable-state properties ────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Toggle(&'static str, &'static str),
        Record(&'static str),
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        let drugs = prop::sample::select(vec!["alpha", "beta", "gamma"]);
        let checks = prop::sample::select(vec!["a_1", "a_2", "a_3", "b_1", "zz"]);
        prop_oneof![
            8 => (drugs.clone(), checks).prop_map(|(d, c)| Op::Toggle(d, c)),
            3 => drugs.prop_map(Op::Record),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_operation_sequence(ops in prop::collection::vec(op(), 0..60)) {
            let slot = MockSlot::new();
            let (mut store, _) = open_store(&slot);
            let catalog = sample_catalog();

            for op in ops {
                let before = store.state().clone();
                match op {
                    Op::Toggle(drug, check) => {
                        let outcome = store.toggle_check(drug, check);
                        // Lock: administered drugs never change.
                        if before.get(drug).is_some_and(|r| r.is_administered()) {
                            prop_assert_eq!(store.state(), &before);
                            prop_assert!(!outcome.is_applied());
                        }
                    }
                    Op::Record(drug) => {
                        let was_complete = catalog.get(drug).is_some_and(|d| {
                            let cleared = &before.get(drug).unwrap().checked_ids;
                            d.check_ids().all(|id| cleared.contains(id))
                        });
                        let outcome = store.record_administration(drug);
                        // Gating: a stamp appears only over a complete checklist.
                        if outcome.is_applied() {
                            prop_assert!(was_complete);
                            prop_assert!(!before.get(drug).unwrap().is_administered());
                        }
                        // Idempotence: an existing stamp is kept.
                        if let Some(prev) = before.get(drug).and_then(|r| r.administered_time.clone()) {
                            prop_assert_eq!(
                                store.record(drug).unwrap().administered_time.clone(),
                                Some(prev)
                            );
                        }
                    }
                    Op::Reset => {
                        store.reset();
                        prop_assert!(store.state().is_pristine());
                    }
                }

                // Coverage and subset hold after every step.
                let keys: BTreeSet<&str> = store.state().drugs.keys().map(String::as_str).collect();
                let expected: BTreeSet<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
                prop_assert_eq!(keys, expected);
                for drug in catalog.iter() {
                    let record = store.record(&drug.id).unwrap();
                    for id in &record.checked_ids {
                        prop_assert!(drug.has_check(id));
                    }
                }

                // Round-trip: whatever was persisted reloads as the live state.
                let persisted: AppState = serde_json::from_str(&slot.value().unwrap_or_else(|| "{}".into())).unwrap();
                if slot.writes() > 0 {
                    prop_assert_eq!(&persisted, store.state());
                }
            }
        }
    }
}
