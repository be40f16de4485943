//! # acscheck-storage
//!
//! Durable key-value slots for the serialized checklist state.
//!
//! ## Overview
//!
//! Each slot owns one versioned key and stores one string: the JSON form of
//! `AppState`. `FileSlot` is what the application uses on a device;
//! `InMemorySlot` backs tests and the demo runner.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acscheck_storage::FileSlot;
//!
//! let slot = FileSlot::new("/var/lib/acscheck", acscheck_core::STORAGE_KEY);
//! let persistence = PersistenceAdapter::new(Box::new(slot), Box::new(verifier), catalog);
//! ```

pub mod file;
pub mod memory;

pub use file::FileSlot;
pub use memory::InMemorySlot;

// ── Tests ─────────────────────────────────────────────────────────────────────
