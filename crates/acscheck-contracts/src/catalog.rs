//! Drug catalog types.
//!
//! A `Catalog` is static configuration: loaded once at startup, validated,
//! and never mutated for the lifetime of the process. Everything the store
//! knows about which checks exist for which drug comes from here.

use serde::{Deserialize, Serialize};

/// One contraindication check shown under a drug.
///
/// The clinician marks the item to affirm the contraindication is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable identifier, unique across the whole catalog (e.g. "asp_1").
    pub id: String,
    /// Display text.
    pub label: String,
}

/// A drug and the ordered list of checks that gate its administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugDefinition {
    /// Stable identifier and persistence key (e.g. "aspirin").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Dosage label rendered next to the name (e.g. "3顆").
    pub dose_highlight: String,
    /// Short note rendered after the dosage (e.g. "▶️需做EKG").
    #[serde(default)]
    pub suffix_note: String,
    /// What to do once every check is cleared.
    pub action_label: String,
    /// Checks in display order.
    pub checklist: Vec<ChecklistItem>,
}

impl DrugDefinition {
    /// Iterate the checklist item ids in display order.
    pub fn check_ids(&self) -> impl Iterator<Item = &str> {
        self.checklist.iter().map(|item| item.id.as_str())
    }

    /// True if `check_id` is declared in this drug's checklist.
    pub fn has_check(&self, check_id: &str) -> bool {
        self.checklist.iter().any(|item| item.id == check_id)
    }
}

/// The ordered, read-only set of drugs the application knows about.
///
/// Construction does not validate; use the loaders in `acscheck-config`,
/// which reject duplicate or empty identifiers before handing a catalog out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub drugs: Vec<DrugDefinition>,
}

impl Catalog {
    pub fn new(drugs: Vec<DrugDefinition>) -> Self {
        Self { drugs }
    }

    /// Look up a drug by id.
    pub fn get(&self, drug_id: &str) -> Option<&DrugDefinition> {
        self.drugs.iter().find(|d| d.id == drug_id)
    }

    /// Iterate drugs in display order.
    pub fn iter(&self) -> impl Iterator<Item = &DrugDefinition> {
        self.drugs.iter()
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}
