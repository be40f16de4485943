//! # acscheck-verify
//!
//! Verification of persisted checklist state.
//!
//! This crate provides [`engine::StateShapeVerifier`], which implements the
//! [`acscheck_core::traits::StateVerifier`] trait. A blob read from the
//! durable slot is checked in two phases before it becomes an `AppState`:
//!
//! 1. **Structural** — JSON Schema validation via the `jsonschema` crate.
//! 2. **Catalog** — record coverage, checklist membership, and the rule that
//!    a timestamp only exists over a complete checklist.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use acscheck_verify::StateShapeVerifier;
//!
//! let persistence = PersistenceAdapter::new(Box::new(slot), Box::new(StateShapeVerifier::new()), catalog);
//! ```

pub mod engine;

pub use engine::{state_schema, StateShapeVerifier};
