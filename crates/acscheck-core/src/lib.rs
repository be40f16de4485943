//! # acscheck-core
//!
//! The checklist-gated administration state machine and its persistence
//! contract.
//!
//! This crate provides:
//! - The seam traits (`StateSlot`, `StateVerifier`, `Clock`)
//! - `PersistenceAdapter`, which moves `AppState` in and out of a slot with
//!   fallback to fresh state on any failure
//! - `ChecklistStore`, the only component that mutates `AppState`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acscheck_core::{ChecklistStore, PersistenceAdapter, SystemClock};
//!
//! let persistence = PersistenceAdapter::new(Box::new(slot), Box::new(verifier), catalog);
//! let mut store = ChecklistStore::open(persistence, Box::new(SystemClock));
//! store.toggle_check("aspirin", "asp_1");
//! ```

pub mod clock;
pub mod persistence;
pub mod store;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{format_time, FixedClock, SystemClock, TIME_FORMAT};
pub use persistence::PersistenceAdapter;
pub use store::ChecklistStore;

/// Versioned key of the durable slot holding the checklist state.
pub const STORAGE_KEY: &str = "acs_drug_check_v1";
