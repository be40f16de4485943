//! Results of checklist operations.
//!
//! Rejected operations are not errors. A toggle on a locked drug or a record
//! attempt with open checks leaves state untouched and reports why, so the
//! presentation layer can explain what happened without handling `Err`.

use serde::{Deserialize, Serialize};

/// Result of `ChecklistStore::toggle_check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The check is now marked cleared.
    Checked,
    /// The check is no longer marked cleared.
    Unchecked,
    /// The drug is already administered; its checklist is frozen.
    Locked { administered_time: String },
    /// No drug with this id exists in the catalog.
    UnknownDrug,
    /// The check id is not part of this drug's checklist.
    UnknownCheck,
}

impl ToggleOutcome {
    /// True if state changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, ToggleOutcome::Checked | ToggleOutcome::Unchecked)
    }
}

/// Result of `ChecklistStore::record_administration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdministerOutcome {
    /// The timestamp was written.
    Recorded { time: String },
    /// A timestamp already existed and was kept (first write wins).
    AlreadyAdministered { time: String },
    /// Some checks are still open; nothing was written.
    ChecklistIncomplete { missing: Vec<String> },
    /// No drug with this id exists in the catalog.
    UnknownDrug,
}

impl AdministerOutcome {
    /// True if state changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, AdministerOutcome::Recorded { .. })
    }
}
