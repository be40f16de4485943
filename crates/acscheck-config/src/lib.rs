//! # acscheck-config
//!
//! TOML-driven configuration for the ACS checklist.
//!
//! ## Overview
//!
//! - [`catalog`] parses and validates drug catalogs. The ACS catalog is
//!   embedded; alternates are read from TOML files.
//! - [`Settings`] says where the durable slot lives, which key it uses, and
//!   which catalog to load.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use acscheck_config::Settings;
//!
//! let settings = Settings::load(Some(Path::new("acscheck.toml")))?;
//! let catalog = settings.catalog()?;
//! ```

pub mod catalog;
pub mod settings;

pub use settings::{default_storage_dir, Settings};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use acscheck_contracts::error::ChecklistError;

    use crate::{catalog, Settings};

    // ── Built-in catalog ──────────────────────────────────────────────────────

    #[test]
    fn builtin_catalog_has_the_three_acs_drugs() {
        let catalog = catalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["aspirin", "ntg", "ticagrelor"]);

        let aspirin = catalog.get("aspirin").unwrap();
        assert_eq!(
            aspirin.check_ids().collect::<Vec<_>>(),
            vec!["asp_1", "asp_2", "asp_3", "asp_4", "asp_5"]
        );
        assert_eq!(aspirin.dose_highlight, "3顆");

        assert_eq!(catalog.get("ntg").unwrap().checklist.len(), 6);
        assert_eq!(catalog.get("ticagrelor").unwrap().checklist.len(), 5);
        assert!(catalog
            .get("ticagrelor")
            .unwrap()
            .action_label
            .contains("180mg"));
    }

    // ── Catalog parsing ───────────────────────────────────────────────────────

    #[test]
    fn catalog_suffix_note_is_optional() {
        let toml = r#"
            [[drugs]]
            id = "heparin"
            name = "Heparin"
            dose_highlight = "5000U"
            action_label = "IV bolus"

            [[drugs.checklist]]
            id = "hep_1"
            label = "active bleeding"
        "#;

        let catalog = catalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.get("heparin").unwrap().suffix_note, "");
    }

    #[test]
    fn catalog_parse_error_is_config_error() {
        match catalog::from_toml_str("this is not valid toml ][[[") {
            Err(ChecklistError::Config { reason }) => {
                assert!(reason.contains("failed to parse catalog TOML"), "got: {reason}");
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    #[test]
    fn catalog_rejects_empty() {
        assert!(matches!(
            catalog::from_toml_str("drugs = []"),
            Err(ChecklistError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn catalog_rejects_duplicate_drug_ids() {
        let toml = r#"
            [[drugs]]
            id = "a"
            name = "A"
            dose_highlight = "1"
            action_label = "x"
            checklist = [{ id = "a_1", label = "l" }]

            [[drugs]]
            id = "a"
            name = "A again"
            dose_highlight = "1"
            action_label = "x"
            checklist = [{ id = "a_2", label = "l" }]
        "#;

        match catalog::from_toml_str(toml) {
            Err(ChecklistError::InvalidCatalog { reason }) => {
                assert!(reason.contains("duplicate drug id 'a'"), "got: {reason}");
            }
            other => panic!("expected InvalidCatalog, got {:?}", other),
        }
    }

    /// Check ids are persisted without their drug, so they must be unique
    /// across drugs too.
    #[test]
    fn catalog_rejects_check_ids_shared_between_drugs() {
        let toml = r#"
            [[drugs]]
            id = "a"
            name = "A"
            dose_highlight = "1"
            action_label = "x"
            checklist = [{ id = "shared", label = "l" }]

            [[drugs]]
            id = "b"
            name = "B"
            dose_highlight = "1"
            action_label = "x"
            checklist = [{ id = "shared", label = "l" }]
        "#;

        match catalog::from_toml_str(toml) {
            Err(ChecklistError::InvalidCatalog { reason }) => {
                assert!(reason.contains("duplicate check id 'shared'"), "got: {reason}");
            }
            other => panic!("expected InvalidCatalog, got {:?}", other),
        }
    }

    #[test]
    fn catalog_rejects_empty_checklist() {
        let toml = r#"
            [[drugs]]
            id = "a"
            name = "A"
            dose_highlight = "1"
            action_label = "x"
            checklist = []
        "#;

        assert!(matches!(
            catalog::from_toml_str(toml),
            Err(ChecklistError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn catalog_missing_file_is_config_error() {
        let result = catalog::from_file(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(ChecklistError::Config { .. })));
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    #[test]
    fn empty_settings_use_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.storage_key, "acs_drug_check_v1");
        assert!(settings.storage_dir.ends_with("acscheck") || settings.storage_dir.ends_with(".acscheck"));
        assert!(settings.catalog_path.is_none());
    }

    #[test]
    fn settings_override_fields() {
        let settings = Settings::from_toml_str(
            r#"
            storage_dir = "/tmp/acs"
            storage_key = "acs_drug_check_v2"
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage_dir, PathBuf::from("/tmp/acs"));
        assert_eq!(settings.storage_key, "acs_drug_check_v2");
    }

    #[test]
    fn settings_reject_unknown_fields() {
        let result = Settings::from_toml_str("storage_path = \"/tmp\"");
        assert!(matches!(result, Err(ChecklistError::Config { .. })));
    }

    #[test]
    fn settings_reject_path_like_keys() {
        for key in ["", "../escape", ".hidden", "a/b"] {
            let toml = format!("storage_key = {:?}", key);
            assert!(
                matches!(Settings::from_toml_str(&toml), Err(ChecklistError::Config { .. })),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn settings_load_without_path_is_default() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn settings_load_missing_file_is_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/acscheck.toml"))).is_err());
    }

    #[test]
    fn settings_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_file = dir.path().join("catalog.toml");
        std::fs::write(
            &catalog_file,
            r#"
            [[drugs]]
            id = "morphine"
            name = "Morphine"
            dose_highlight = "2mg"
            action_label = "IV"
            checklist = [{ id = "mor_1", label = "SBP < 90" }]
            "#,
        )
        .unwrap();

        let settings_file = dir.path().join("acscheck.toml");
        std::fs::write(
            &settings_file,
            format!("catalog_path = {:?}\n", catalog_file.display().to_string()),
        )
        .unwrap();

        let settings = Settings::load(Some(&settings_file)).unwrap();
        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("morphine").unwrap().has_check("mor_1"));
    }

    #[test]
    fn settings_without_catalog_path_use_builtin() {
        let catalog = Settings::default().catalog().unwrap();
        assert!(catalog.get("aspirin").is_some());
    }
}
