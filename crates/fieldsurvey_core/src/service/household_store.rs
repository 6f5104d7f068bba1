//! Store Facade: sole read/write surface over the household collection.
//!
//! # Responsibility
//! - Load (or seed) the collection at open and keep it in memory.
//! - Write through to `LocalStore` after every mutation call.
//!
//! # Invariants
//! - Ids are unique within the collection; duplicate adds are rejected.
//! - `update` always leaves the record `Pending` with a strictly later
//!   `last_modified`.
//! - Only `acknowledge_synced` moves a record to `Synced`.
//! - The in-memory collection stays authoritative when persistence fails.

use crate::clock::Clock;
use crate::model::household::{Household, HouseholdId, HouseholdValidationError};
use crate::model::timestamp::to_millis;
use crate::store::kv::KeyValueStore;
use crate::store::local_store::LocalStore;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected write on the Store Facade.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Validation(HouseholdValidationError),
    DuplicateId(HouseholdId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "household id already exists: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<HouseholdValidationError> for StoreError {
    fn from(value: HouseholdValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Owned, injectable household store with write-through persistence.
pub struct HouseholdStore<K: KeyValueStore> {
    local: LocalStore<K>,
    clock: Box<dyn Clock>,
    households: Vec<Household>,
    last_sync_time: Option<DateTime<Utc>>,
}

impl<K: KeyValueStore> HouseholdStore<K> {
    /// Opens the store from persisted state.
    ///
    /// # Contract
    /// - Nothing persisted (or unreadable blob): seeds `Household::sample`
    ///   and persists it.
    /// - A persisted empty array stays empty.
    pub fn open(local: LocalStore<K>, clock: Box<dyn Clock>) -> Self {
        let mut store = Self {
            local,
            clock,
            households: Vec::new(),
            last_sync_time: None,
        };
        store.reload();
        store
    }

    /// Re-reads persisted state, discarding the in-memory collection.
    pub fn reload(&mut self) {
        self.households = match self.local.load() {
            Some(households) => households,
            None => {
                let seeded = vec![Household::sample(self.clock.now())];
                info!("event=households_seed module=service status=ok count=1");
                self.local.save(&seeded);
                seeded
            }
        };
        self.last_sync_time = self.local.load_last_sync_time();
        info!(
            "event=store_open module=service status=ok count={} pending={}",
            self.households.len(),
            self.pending_count()
        );
    }

    /// Current collection in insertion order.
    pub fn list(&self) -> &[Household] {
        &self.households
    }

    pub fn get(&self, id: &HouseholdId) -> Option<&Household> {
        self.households.iter().find(|household| &household.id == id)
    }

    pub fn len(&self) -> usize {
        self.households.len()
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    /// Appends a caller-built household; ids are never generated here.
    ///
    /// Timestamps are truncated to millisecond precision before storing.
    ///
    /// # Errors
    /// - `Validation` for an empty id or out-of-range coordinates.
    /// - `DuplicateId` when a record with the same id exists.
    pub fn add(&mut self, mut household: Household) -> StoreResult<()> {
        household.validate()?;
        household.truncate_timestamps();
        if self.position(&household.id).is_some() {
            warn!(
                "event=household_add module=service status=error error_code=duplicate_id id={}",
                household.id
            );
            return Err(StoreError::DuplicateId(household.id));
        }

        info!(
            "event=household_add module=service status=ok id={} sync_status={}",
            household.id, household.sync_status
        );
        self.households.push(household);
        self.persist();
        Ok(())
    }

    /// Replaces the record with the same id (last write wins).
    ///
    /// Returns `Ok(false)` when no record matches. The stored copy is marked
    /// `Pending` and gets a fresh `last_modified` regardless of what the
    /// caller passed.
    pub fn update(&mut self, mut household: Household) -> StoreResult<bool> {
        household.validate()?;
        let Some(index) = self.position(&household.id) else {
            warn!(
                "event=household_update module=service status=skipped reason=not_found id={}",
                household.id
            );
            self.persist();
            return Ok(false);
        };

        let previous = self.households[index].last_modified;
        household.mark_edited(self.edit_timestamp(previous));
        info!(
            "event=household_update module=service status=ok id={}",
            household.id
        );
        self.households[index] = household;
        self.persist();
        Ok(true)
    }

    /// Removes by id; returns whether a record was removed.
    pub fn delete(&mut self, id: &HouseholdId) -> bool {
        let before = self.households.len();
        self.households.retain(|household| &household.id != id);
        let removed = self.households.len() != before;
        info!(
            "event=household_delete module=service status={} id={}",
            if removed { "ok" } else { "skipped" },
            id
        );
        self.persist();
        removed
    }

    /// Sync acknowledgement path.
    ///
    /// Sets `Synced` on matching records without touching other fields,
    /// records `at` as last sync time and persists both in one backend
    /// write. Unknown ids are ignored. Returns the number of acknowledged
    /// records.
    pub fn acknowledge_synced(&mut self, ids: &[HouseholdId], at: DateTime<Utc>) -> usize {
        let mut acknowledged = 0;
        for household in self
            .households
            .iter_mut()
            .filter(|household| ids.contains(&household.id))
        {
            household.mark_synced();
            acknowledged += 1;
        }

        let at = to_millis(at);
        self.last_sync_time = Some(at);
        self.local.save_synced(&self.households, at);
        acknowledged
    }

    /// Records that still need reconciliation, in collection order.
    pub fn pending(&self) -> Vec<Household> {
        self.households
            .iter()
            .filter(|household| household.needs_sync())
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.households
            .iter()
            .filter(|household| household.needs_sync())
            .count()
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.last_sync_time
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn local_store(&self) -> &LocalStore<K> {
        &self.local
    }

    fn position(&self, id: &HouseholdId) -> Option<usize> {
        self.households
            .iter()
            .position(|household| &household.id == id)
    }

    // last_modified must move forward by at least one persisted tick even
    // when the clock has not.
    fn edit_timestamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = to_millis(self.clock.now());
        let previous = to_millis(previous);
        if now > previous {
            now
        } else {
            previous + Duration::milliseconds(1)
        }
    }

    fn persist(&self) {
        self.local.save(&self.households);
    }
}
