//! Sync Coordinator: drives pending records through a `Reconciler`.
//!
//! # Responsibility
//! - Skip reconciliation while offline.
//! - Retry only retryable per-record rejections, bounded by `max_attempts`.
//! - Write accepted ids and the sync time back through the Store Facade.
//!
//! # Invariants
//! - A batch-level error on the first attempt leaves the store unchanged.
//! - Rejected records keep their previous `Pending`/`Offline` status.
//! - Already-synced records are never sent.

use crate::config::DEFAULT_SYNC_MAX_ATTEMPTS;
use crate::connectivity::ConnectivityMonitor;
use crate::model::household::{Household, HouseholdId};
use crate::service::household_store::HouseholdStore;
use crate::store::kv::KeyValueStore;
use crate::sync::reconciler::{
    AcknowledgeAllReconciler, ReconcileError, Reconciler, RecordStatus,
};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::time::Instant;

/// Terminal state of one `sync` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    SkippedOffline,
    Completed,
    Failed(ReconcileError),
}

/// Record that did not reach `Synced` in this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    pub id: HouseholdId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub synced: Vec<HouseholdId>,
    pub failed: Vec<FailedRecord>,
    pub attempts: u32,
    pub synced_at: Option<DateTime<Utc>>,
}

impl SyncReport {
    fn without_changes(outcome: SyncOutcome, attempts: u32) -> Self {
        Self {
            outcome,
            synced: Vec::new(),
            failed: Vec::new(),
            attempts,
            synced_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == SyncOutcome::Completed
    }
}

pub struct SyncCoordinator {
    reconciler: Box<dyn Reconciler>,
    max_attempts: u32,
}

impl Default for SyncCoordinator {
    fn default() -> Self {
        Self::new(Box::new(AcknowledgeAllReconciler), DEFAULT_SYNC_MAX_ATTEMPTS)
    }
}

impl SyncCoordinator {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(reconciler: Box<dyn Reconciler>, max_attempts: u32) -> Self {
        Self {
            reconciler,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs one reconciliation pass to completion.
    ///
    /// Errors are logged and reported in the returned `SyncReport`; nothing
    /// is raised to the caller.
    pub fn sync<K: KeyValueStore>(
        &self,
        store: &mut HouseholdStore<K>,
        connectivity: &ConnectivityMonitor,
    ) -> SyncReport {
        if !connectivity.is_online() {
            info!("event=sync module=sync status=skipped reason=offline");
            return SyncReport::without_changes(SyncOutcome::SkippedOffline, 0);
        }

        let started_at = Instant::now();
        let pending = store.pending();
        info!(
            "event=sync module=sync status=start pending={}",
            pending.len()
        );

        let mut synced: Vec<HouseholdId> = Vec::new();
        let mut failed: Vec<FailedRecord> = Vec::new();
        let mut batch = pending;
        let mut attempts = 0;

        while !batch.is_empty() {
            attempts += 1;
            let outcomes = match self.reconciler.reconcile(&batch) {
                Ok(outcomes) => outcomes,
                Err(err) if attempts == 1 => {
                    error!(
                        "event=sync module=sync status=error attempt=1 error_code={} duration_ms={} error={}",
                        err.code,
                        started_at.elapsed().as_millis(),
                        err.message
                    );
                    return SyncReport::without_changes(SyncOutcome::Failed(err), attempts);
                }
                Err(err) => {
                    warn!(
                        "event=sync_retry module=sync status=error attempt={} error_code={} remaining={}",
                        attempts,
                        err.code,
                        batch.len()
                    );
                    failed.extend(batch.iter().map(|household| FailedRecord {
                        id: household.id.clone(),
                        reason: err.to_string(),
                    }));
                    break;
                }
            };

            let mut retry: Vec<Household> = Vec::new();
            for household in batch {
                let status = outcomes
                    .iter()
                    .find(|outcome| outcome.id == household.id)
                    .map(|outcome| outcome.status.clone());
                match status {
                    Some(RecordStatus::Accepted) => synced.push(household.id),
                    Some(RecordStatus::Rejected {
                        retryable: true, ..
                    })
                    | None
                        if attempts < self.max_attempts =>
                    {
                        retry.push(household)
                    }
                    Some(RecordStatus::Rejected { reason, .. }) => failed.push(FailedRecord {
                        id: household.id,
                        reason,
                    }),
                    None => failed.push(FailedRecord {
                        id: household.id,
                        reason: "no outcome returned".to_string(),
                    }),
                }
            }

            if !retry.is_empty() {
                info!(
                    "event=sync_retry module=sync status=start attempt={} retry={}",
                    attempts + 1,
                    retry.len()
                );
            }
            batch = retry;
        }

        let synced_at = store.now();
        store.acknowledge_synced(&synced, synced_at);
        info!(
            "event=sync module=sync status=ok synced={} failed={} attempts={} duration_ms={}",
            synced.len(),
            failed.len(),
            attempts,
            started_at.elapsed().as_millis()
        );

        SyncReport {
            outcome: SyncOutcome::Completed,
            synced,
            failed,
            attempts,
            synced_at: store.last_sync_time(),
        }
    }
}
