//! Survey domain model.
//!
//! # Responsibility
//! - Define the household record shared by capture, edit, sync and export.
//! - Keep wire naming compatible with the persisted local-storage blob.
//!
//! # Invariants
//! - Every household is identified by a stable `HouseholdId`.
//! - `sync_status` is the only source of truth for reconciliation state.

pub mod household;
pub mod location;
pub mod timestamp;
