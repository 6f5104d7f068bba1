//! Reconciliation strategy contract.

use crate::model::household::{Household, HouseholdId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Per-record result returned by a reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: HouseholdId,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Accepted,
    Rejected { reason: String, retryable: bool },
}

impl RecordOutcome {
    pub fn accepted(id: HouseholdId) -> Self {
        Self {
            id,
            status: RecordStatus::Accepted,
        }
    }

    pub fn rejected(id: HouseholdId, reason: impl Into<String>, retryable: bool) -> Self {
        Self {
            id,
            status: RecordStatus::Rejected {
                reason: reason.into(),
                retryable,
            },
        }
    }
}

/// Batch-level failure: the exchange as a whole did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileError {
    pub code: String,
    pub message: String,
}

impl ReconcileError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for ReconcileError {}

/// Exchanges pending records with a remote authority.
///
/// Records missing from the returned outcomes are treated as not synced.
pub trait Reconciler {
    fn reconcile(&self, pending: &[Household]) -> Result<Vec<RecordOutcome>, ReconcileError>;
}

/// Local-only strategy: acknowledges every record without a remote call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgeAllReconciler;

impl Reconciler for AcknowledgeAllReconciler {
    fn reconcile(&self, pending: &[Household]) -> Result<Vec<RecordOutcome>, ReconcileError> {
        Ok(pending
            .iter()
            .map(|household| RecordOutcome::accepted(household.id.clone()))
            .collect())
    }
}
