//! Walk-through scenarios for the checklist state machine.
//!
//! Every scenario wires the real components together: the embedded ACS
//! catalog, `StateShapeVerifier`, `PersistenceAdapter`, and `ChecklistStore`.
//! The only stand-ins are an `InMemorySlot` for the durable slot and a
//! `FixedClock` pinned to 14:05:30 so the printed timestamps are stable.

use std::sync::Arc;

use acscheck_config::catalog;
use acscheck_contracts::{
    error::{ChecklistError, ChecklistResult},
    outcome::{AdministerOutcome, ToggleOutcome},
    state::AppState,
};
use acscheck_core::{ChecklistStore, FixedClock, PersistenceAdapter, STORAGE_KEY};
use acscheck_storage::InMemorySlot;
use acscheck_verify::StateShapeVerifier;

/// What a scenario observed.
#[derive(Debug)]
pub struct ScenarioReport {
    pub name: &'static str,
    /// Whether every expectation of the scenario held.
    pub passed: bool,
    pub final_state: AppState,
}

// ── Wiring ────────────────────────────────────────────────────────────────────

/// Open a store over `slot` with the embedded catalog and a clock at 14:05:30.
pub fn open_store(slot: &InMemorySlot) -> ChecklistResult<ChecklistStore> {
    let catalog = Arc::new(catalog::builtin()?);
    let clock = FixedClock::at(14, 5, 30).ok_or_else(|| ChecklistError::Config {
        reason: "demo clock time out of range".to_string(),
    })?;
    let persistence = PersistenceAdapter::new(
        Box::new(slot.clone()),
        Box::new(StateShapeVerifier::new()),
        catalog,
    );
    Ok(ChecklistStore::open(persistence, Box::new(clock)))
}

fn check(label: &str, ok: bool) -> bool {
    println!("  {:<46} {}", label, if ok { "PASS" } else { "FAIL" });
    ok
}

fn print_state(store: &ChecklistStore) {
    for drug in store.catalog().iter() {
        let Some(record) = store.record(&drug.id) else {
            continue;
        };
        let ids: Vec<&str> = record.checked_ids.iter().map(String::as_str).collect();
        println!(
            "    {:<11} checked=[{}] administered={}",
            drug.id,
            ids.join(", "),
            record.administered_time.as_deref().unwrap_or("null")
        );
    }
}

fn clear_all(store: &mut ChecklistStore, drug_id: &str) -> bool {
    let ids: Vec<String> = store.missing_checks(drug_id).into_iter().map(String::from).collect();
    ids.iter()
        .all(|id| store.toggle_check(drug_id, id) == ToggleOutcome::Checked)
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

/// Scenario 1: no durable slot yet.
pub fn fresh_start() -> ChecklistResult<ScenarioReport> {
    println!("=== Scenario 1: Fresh start ===");
    println!();

    let slot = InMemorySlot::new(STORAGE_KEY);
    let store = open_store(&slot)?;
    print_state(&store);
    println!();

    let passed = check(
        "every drug empty and unadministered",
        store.state() == &AppState::fresh(store.catalog()),
    );
    println!();

    Ok(ScenarioReport {
        name: "fresh-start",
        passed,
        final_state: store.state().clone(),
    })
}

/// Scenario 2: clear every aspirin check, record, then try to untick.
pub fn administer() -> ChecklistResult<ScenarioReport> {
    println!("=== Scenario 2: Full checklist, record, lock ===");
    println!();

    let slot = InMemorySlot::new(STORAGE_KEY);
    let mut store = open_store(&slot)?;
    let (passed, _) = administer_aspirin(&mut store, &slot)?;
    println!();

    Ok(ScenarioReport {
        name: "administer",
        passed,
        final_state: store.state().clone(),
    })
}

fn administer_aspirin(
    store: &mut ChecklistStore,
    slot: &InMemorySlot,
) -> ChecklistResult<(bool, String)> {
    let mut passed = check("asp_1..asp_5 cleared", clear_all(store, "aspirin"));

    let time = match store.record_administration("aspirin") {
        AdministerOutcome::Recorded { time } => time,
        other => {
            println!("  unexpected outcome: {:?}", other);
            String::new()
        }
    };
    passed &= check("administration recorded at 14:05:30", time == "14:05:30");

    let before = store.record("aspirin").cloned();
    let outcome = store.toggle_check("aspirin", "asp_1");
    passed &= check(
        "toggle after administration is locked",
        matches!(outcome, ToggleOutcome::Locked { .. }) && store.record("aspirin").cloned() == before,
    );

    // A second session over the same slot sees the same record.
    let reopened = open_store(slot)?;
    passed &= check("timestamp survives reopening", reopened.state() == store.state());

    print_state(store);
    Ok((passed, time))
}

/// Scenario 3: five of six NTG checks, then an attempt to record.
pub fn incomplete() -> ChecklistResult<ScenarioReport> {
    println!("=== Scenario 3: Incomplete checklist ===");
    println!();

    let slot = InMemorySlot::new(STORAGE_KEY);
    let mut store = open_store(&slot)?;

    let mut passed = true;
    for id in ["ntg_1", "ntg_2", "ntg_3", "ntg_4", "ntg_5"] {
        passed &= store.toggle_check("ntg", id) == ToggleOutcome::Checked;
    }
    check("ntg_1..ntg_5 cleared", passed);

    let outcome = store.record_administration("ntg");
    passed &= check(
        "record rejected, ntg_6 still open",
        outcome
            == AdministerOutcome::ChecklistIncomplete {
                missing: vec!["ntg_6".to_string()],
            },
    );
    passed &= check("administeredTime remains null", !store.is_administered("ntg"));
    print_state(&store);
    println!();

    Ok(ScenarioReport {
        name: "incomplete",
        passed,
        final_state: store.state().clone(),
    })
}

/// Scenario 4: the durable slot holds text that is not JSON.
pub fn corrupt_slot() -> ChecklistResult<ScenarioReport> {
    println!("=== Scenario 4: Corrupted durable slot ===");
    println!();

    let slot = InMemorySlot::with_value(STORAGE_KEY, "%%% definitely not json");
    let store = open_store(&slot)?;

    let passed = check(
        "load falls back to fresh state",
        store.state() == &AppState::fresh(store.catalog()),
    );
    print_state(&store);
    println!();

    Ok(ScenarioReport {
        name: "corrupt-slot",
        passed,
        final_state: store.state().clone(),
    })
}

/// Scenario 5: after scenario 2, reset behind a confirmation prompt.
///
/// `confirm` is asked once; declining must leave everything as it was.
pub fn reset(confirm: &mut dyn FnMut(&str) -> bool) -> ChecklistResult<ScenarioReport> {
    println!("=== Scenario 5: Confirmed reset ===");
    println!();

    let slot = InMemorySlot::new(STORAGE_KEY);
    let mut store = open_store(&slot)?;
    let (mut passed, _) = administer_aspirin(&mut store, &slot)?;
    println!();

    let before = store.state().clone();
    if confirm("Reset all records? Every check and time will be cleared.") {
        store.reset();
        passed &= check("every drug back to fresh", store.state().is_pristine());
        let reopened = open_store(&slot)?;
        passed &= check("slot holds the fresh state", reopened.state().is_pristine());
    } else {
        passed &= check("declined: state unchanged", store.state() == &before);
    }
    print_state(&store);
    println!();

    Ok(ScenarioReport {
        name: "reset",
        passed,
        final_state: store.state().clone(),
    })
}
