//! File-backed implementation of `StateSlot`.
//!
//! The slot for key `k` lives at `<dir>/<k>.json`. Writes go to a sibling
//! temporary file that is renamed over the target, so a crash mid-write
//! leaves either the old value or the new one, never a torn file.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use acscheck_contracts::error::{ChecklistError, ChecklistResult};
use acscheck_core::traits::StateSlot;

/// A durable slot stored as one JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    key: String,
    dir: PathBuf,
    path: PathBuf,
}

impl FileSlot {
    /// A slot for `key` inside `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        let dir = dir.into();
        let key = key.into();
        let path = dir.join(format!("{}.json", key));
        Self { key, dir, path }
    }

    /// Full path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", self.key))
    }
}

impl StateSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> ChecklistResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(path = %self.path.display(), bytes = contents.len(), "slot read");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChecklistError::StorageRead {
                reason: format!("failed to read '{}': {}", self.path.display(), e),
            }),
        }
    }

    fn write(&self, value: &str) -> ChecklistResult<()> {
        let write_err = |action: &str, path: &Path, e: std::io::Error| ChecklistError::StorageWrite {
            reason: format!("failed to {} '{}': {}", action, path.display(), e),
        };

        fs::create_dir_all(&self.dir).map_err(|e| write_err("create", &self.dir, e))?;

        let temp = self.temp_path();
        fs::write(&temp, value).map_err(|e| write_err("write", &temp, e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(write_err("replace", &self.path, e));
        }

        debug!(path = %self.path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self) -> ChecklistResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChecklistError::StorageWrite {
                reason: format!("failed to remove '{}': {}", self.path.display(), e),
            }),
        }
    }
}
