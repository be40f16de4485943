//! Application settings.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! is a valid configuration:
//!
//! ```toml
//! storage_dir = "/var/lib/acscheck"
//! storage_key = "acs_drug_check_v1"
//! catalog_path = "/etc/acscheck/catalog.toml"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use acscheck_contracts::{
    catalog::Catalog,
    error::{ChecklistError, ChecklistResult},
};
use acscheck_core::STORAGE_KEY;

use crate::catalog;

/// Where state is stored and which catalog to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the durable slot file.
    pub storage_dir: PathBuf,
    /// Versioned slot key; also the slot's file stem.
    pub storage_key: String,
    /// Alternate catalog file. The embedded ACS catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: STORAGE_KEY.to_string(),
            catalog_path: None,
        }
    }
}

/// `<platform data dir>/acscheck`, or `./.acscheck` where there is none.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("acscheck"))
        .unwrap_or_else(|| PathBuf::from(".acscheck"))
}

impl Settings {
    /// Parse settings from TOML and validate them.
    pub fn from_toml_str(s: &str) -> ChecklistResult<Self> {
        let settings: Settings = toml::from_str(s).map_err(|e| ChecklistError::Config {
            reason: format!("failed to parse settings TOML: {}", e),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse the settings file at `path`.
    pub fn from_file(path: &Path) -> ChecklistResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChecklistError::Config {
            reason: format!("failed to read settings file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Settings from `path` if given, defaults otherwise. An explicitly named
    /// file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> ChecklistResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The configured catalog, validated.
    pub fn catalog(&self) -> ChecklistResult<Catalog> {
        match &self.catalog_path {
            Some(path) => catalog::from_file(path),
            None => catalog::builtin(),
        }
    }

    /// The storage key doubles as a file name, so it is restricted to
    /// ASCII letters, digits, `_`, `-` and `.`, and may not start with `.`.
    pub fn validate(&self) -> ChecklistResult<()> {
        let key = &self.storage_key;
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
        if key.is_empty() || key.starts_with('.') || !key.chars().all(allowed) {
            return Err(ChecklistError::Config {
                reason: format!("invalid storage_key '{}'", key),
            });
        }
        Ok(())
    }
}
