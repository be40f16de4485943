//! In-memory implementation of `StateSlot`.
//!
//! `InMemorySlot` keeps its value behind `Arc<Mutex<_>>`. Clones share the
//! same storage, so a caller can hand one clone to the persistence adapter
//! and keep another to inspect or corrupt what was written.

use std::sync::{Arc, Mutex};

use acscheck_contracts::error::{ChecklistError, ChecklistResult};
use acscheck_core::traits::StateSlot;

/// A volatile slot. Nothing survives the process.
#[derive(Debug, Clone)]
pub struct InMemorySlot {
    key: String,
    pub(crate) value: Arc<Mutex<Option<String>>>,
}

impl InMemorySlot {
    /// An empty slot under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Arc::new(Mutex::new(None)),
        }
    }

    /// A slot pre-populated with `value`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new(key);
        slot.replace(Some(value.into()));
        slot
    }

    /// The current raw value.
    pub fn snapshot(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Overwrite the raw value directly, bypassing serialization.
    pub fn replace(&self, value: Option<String>) {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = value;
    }
}

impl StateSlot for InMemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> ChecklistResult<Option<String>> {
        let value = self.value.lock().map_err(|e| ChecklistError::StorageRead {
            reason: format!("slot lock poisoned: {}", e),
        })?;
        Ok(value.clone())
    }

    fn write(&self, value: &str) -> ChecklistResult<()> {
        let mut slot = self.value.lock().map_err(|e| ChecklistError::StorageWrite {
            reason: format!("slot lock poisoned: {}", e),
        })?;
        *slot = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> ChecklistResult<()> {
        let mut slot = self.value.lock().map_err(|e| ChecklistError::StorageWrite {
            reason: format!("slot lock poisoned: {}", e),
        })?;
        *slot = None;
        Ok(())
    }
}
