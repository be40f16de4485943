//! Per-drug checklist state and the persisted `AppState`.
//!
//! `AppState` is the entire persisted unit. It serializes transparently as a
//! JSON object keyed by drug id:
//!
//! ```json
//! { "aspirin": { "checkedIds": ["asp_1"], "administeredTime": null } }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// The mutable state of one drug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    /// Checklist ids currently marked cleared.
    pub checked_ids: BTreeSet<String>,
    /// Wall-clock time of administration as `HH:MM:SS`, or `None` while the
    /// drug has not been given. Once set, the record is locked.
    pub administered_time: Option<String>,
}

impl DrugRecord {
    pub fn is_administered(&self) -> bool {
        self.administered_time.is_some()
    }
}

/// Mapping from drug id to its record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppState {
    pub drugs: BTreeMap<String, DrugRecord>,
}

impl AppState {
    /// A fresh state: one empty, unadministered record per catalog drug.
    pub fn fresh(catalog: &Catalog) -> Self {
        let drugs = catalog
            .iter()
            .map(|drug| (drug.id.clone(), DrugRecord::default()))
            .collect();
        Self { drugs }
    }

    pub fn get(&self, drug_id: &str) -> Option<&DrugRecord> {
        self.drugs.get(drug_id)
    }

    pub fn get_mut(&mut self, drug_id: &str) -> Option<&mut DrugRecord> {
        self.drugs.get_mut(drug_id)
    }

    /// True if every record is empty and unadministered.
    pub fn is_pristine(&self) -> bool {
        self.drugs
            .values()
            .all(|r| r.checked_ids.is_empty() && r.administered_time.is_none())
    }
}
