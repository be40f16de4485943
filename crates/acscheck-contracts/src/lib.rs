//! # acscheck-contracts
//!
//! Shared types, outcomes, and errors for the ACS contraindication checklist.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod catalog;
pub mod error;
pub mod outcome;
pub mod state;
pub mod verify;
