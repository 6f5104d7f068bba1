//! Offline-first reconciliation.
//!
//! # Responsibility
//! - Define the pluggable `Reconciler` strategy (remote exchange).
//! - Drive pending records through it and write back sync status.
//!
//! # Invariants
//! - Nothing is reconciled while offline.
//! - Only records confirmed by the reconciler become `Synced`.

pub mod coordinator;
pub mod reconciler;
