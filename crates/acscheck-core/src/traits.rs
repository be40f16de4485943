//! Trait seams for the checklist runtime.
//!
//! - `StateSlot`     — the durable key-value slot holding serialized state
//! - `StateVerifier` — trusted checker run on a persisted blob before use
//! - `Clock`         — wall-clock source for administration timestamps
//!
//! The store and persistence adapter only talk to these traits, so both can
//! be exercised in tests with in-memory doubles.

use chrono::NaiveTime;

use acscheck_contracts::{
    catalog::Catalog, error::ChecklistResult, verify::VerificationReport,
};

/// A single string-keyed storage entry.
///
/// Implementations own exactly one key. Reads of an absent entry return
/// `Ok(None)`; only genuine I/O trouble is an error.
pub trait StateSlot: Send + Sync {
    /// The versioned key this slot reads and writes.
    fn key(&self) -> &str;

    /// Return the stored value, or `None` if nothing has been stored.
    fn read(&self) -> ChecklistResult<Option<String>>;

    /// Replace the stored value.
    fn write(&self, value: &str) -> ChecklistResult<()>;

    /// Remove the entry. Removing an absent entry succeeds.
    fn remove(&self) -> ChecklistResult<()>;
}

/// Inspects a raw persisted blob against the catalog before it is trusted.
///
/// Returning `Ok` with `passed = false` means the blob is rejected; `Err`
/// is reserved for the verifier itself being unusable.
pub trait StateVerifier: Send + Sync {
    fn verify(
        &self,
        blob: &serde_json::Value,
        catalog: &Catalog,
    ) -> ChecklistResult<VerificationReport>;
}

/// Source of the local wall-clock time of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}
