//! Error types for the checklist runtime.
//!
//! None of these terminate a session. Storage errors are recovered inside the
//! persistence adapter; configuration errors only surface at startup.

use thiserror::Error;

/// The unified error type for the checklist crates.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// The durable slot exists but could not be read.
    #[error("storage read failed: {reason}")]
    StorageRead { reason: String },

    /// The durable slot could not be written or removed.
    #[error("storage write failed: {reason}")]
    StorageWrite { reason: String },

    /// A persisted blob is not valid JSON, does not have the `AppState`
    /// shape, or disagrees with the catalog.
    #[error("invalid persisted state: {reason}")]
    InvalidState { reason: String },

    /// A settings or catalog file is missing, unreadable, or malformed.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A catalog parsed but violates its structural rules.
    #[error("invalid catalog: {reason}")]
    InvalidCatalog { reason: String },
}

/// Convenience alias used throughout the checklist crates.
pub type ChecklistResult<T> = Result<T, ChecklistError>;
