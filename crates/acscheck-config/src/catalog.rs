//! Drug catalog loading and validation.
//!
//! Catalogs are TOML documents with one `[[drugs]]` table per drug and a
//! nested `[[drugs.checklist]]` table per contraindication check. The ACS
//! catalog ships embedded in the binary; an alternate file can be supplied
//! through `Settings::catalog_path`.
//!
//! Validation rules, applied to every catalog before it is handed out:
//!
//! 1. At least one drug.
//! 2. Drug ids and check ids are non-empty.
//! 3. Drug ids are unique.
//! 4. Every drug has at least one check.
//! 5. Check ids are unique across the whole catalog.

use std::{collections::HashSet, path::Path};

use tracing::debug;

use acscheck_contracts::{
    catalog::Catalog,
    error::{ChecklistError, ChecklistResult},
};

/// The embedded ACS catalog: Aspirin, NTG, Ticagrelor.
const ACS_CATALOG: &str = include_str!("../catalogs/acs.toml");

/// Parse and validate the embedded ACS catalog.
pub fn builtin() -> ChecklistResult<Catalog> {
    from_toml_str(ACS_CATALOG)
}

/// Parse `s` as a TOML catalog and validate it.
///
/// Returns `ChecklistError::Config` for malformed TOML and
/// `ChecklistError::InvalidCatalog` for structural violations.
pub fn from_toml_str(s: &str) -> ChecklistResult<Catalog> {
    let catalog: Catalog = toml::from_str(s).map_err(|e| ChecklistError::Config {
        reason: format!("failed to parse catalog TOML: {}", e),
    })?;
    validate(&catalog)?;
    debug!(drugs = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Read the file at `path` and parse it as a TOML catalog.
pub fn from_file(path: &Path) -> ChecklistResult<Catalog> {
    let contents = std::fs::read_to_string(path).map_err(|e| ChecklistError::Config {
        reason: format!("failed to read catalog file '{}': {}", path.display(), e),
    })?;
    from_toml_str(&contents)
}

/// Check the structural rules listed in the module docs.
pub fn validate(catalog: &Catalog) -> ChecklistResult<()> {
    let invalid = |reason: String| Err(ChecklistError::InvalidCatalog { reason });

    if catalog.is_empty() {
        return invalid("catalog declares no drugs".to_string());
    }

    let mut drug_ids = HashSet::new();
    let mut check_ids = HashSet::new();

    for drug in catalog.iter() {
        if drug.id.trim().is_empty() {
            return invalid(format!("drug '{}' has an empty id", drug.name));
        }
        if !drug_ids.insert(drug.id.as_str()) {
            return invalid(format!("duplicate drug id '{}'", drug.id));
        }
        if drug.checklist.is_empty() {
            return invalid(format!("drug '{}' has an empty checklist", drug.id));
        }
        for item in &drug.checklist {
            if item.id.trim().is_empty() {
                return invalid(format!("drug '{}' has a check with an empty id", drug.id));
            }
            if !check_ids.insert(item.id.as_str()) {
                return invalid(format!(
                    "duplicate check id '{}' (in drug '{}')",
                    item.id, drug.id
                ));
            }
        }
    }

    Ok(())
}
