//! Survey session wiring.
//!
//! # Responsibility
//! - Own the Store Facade, Connectivity Monitor, Sync Coordinator and
//!   location tracker for one agent session.
//! - Trigger exactly one sync per offline-to-online transition, delivered
//!   through the session's own connectivity subscription.
//!
//! # Invariants
//! - Every household mutation goes through `HouseholdStore`.
//! - Sync never runs automatically while offline.

use crate::clock::Clock;
use crate::config::SurveyConfig;
use crate::connectivity::{ConnectivityEvent, ConnectivityMonitor};
use crate::model::household::{Household, HouseholdId};
use crate::model::location::GeoFix;
use crate::service::capture::{new_household_at, LocationTracker};
use crate::service::household_store::{HouseholdStore, StoreResult};
use crate::store::kv::KeyValueStore;
use crate::store::local_store::LocalStore;
use crate::sync::coordinator::{SyncCoordinator, SyncReport};
use crate::sync::reconciler::Reconciler;
use std::sync::mpsc::Receiver;

pub struct SurveySession<K: KeyValueStore> {
    store: HouseholdStore<K>,
    connectivity: ConnectivityMonitor,
    connectivity_events: Receiver<ConnectivityEvent>,
    coordinator: SyncCoordinator,
    tracker: LocationTracker,
    surveyor_name: String,
}

impl<K: KeyValueStore> SurveySession<K> {
    pub fn new(
        store: HouseholdStore<K>,
        mut connectivity: ConnectivityMonitor,
        coordinator: SyncCoordinator,
        surveyor_name: impl Into<String>,
    ) -> Self {
        let connectivity_events = connectivity.subscribe();
        Self {
            store,
            connectivity,
            connectivity_events,
            coordinator,
            tracker: LocationTracker::new(true),
            surveyor_name: surveyor_name.into(),
        }
    }

    /// Builds a session over `backend` using config quota, retry bound and
    /// surveyor name.
    pub fn open(
        config: &SurveyConfig,
        backend: K,
        clock: Box<dyn Clock>,
        reconciler: Box<dyn Reconciler>,
        initially_online: bool,
    ) -> Self {
        let local = LocalStore::new(backend).with_quota(config.storage_quota_bytes);
        Self::new(
            HouseholdStore::open(local, clock),
            ConnectivityMonitor::new(initially_online),
            SyncCoordinator::new(reconciler, config.sync_max_attempts),
            config.surveyor_name.clone(),
        )
    }

    pub fn store(&self) -> &HouseholdStore<K> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HouseholdStore<K> {
        &mut self.store
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn connectivity_mut(&mut self) -> &mut ConnectivityMonitor {
        &mut self.connectivity
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut LocationTracker {
        &mut self.tracker
    }

    /// Applies a platform online/offline signal, then handles the
    /// resulting transition.
    ///
    /// Returns the sync report when the signal brought the session online.
    pub fn set_online(&mut self, online: bool) -> Option<SyncReport> {
        self.connectivity.set_online(online);
        self.process_connectivity_events()
    }

    /// Drains transitions queued on the session's subscription and runs one
    /// sync per `BecameOnline`. Returns the last report, if any sync ran.
    ///
    /// Needed after driving the monitor directly via `connectivity_mut`.
    pub fn process_connectivity_events(&mut self) -> Option<SyncReport> {
        let mut report = None;
        while let Ok(event) = self.connectivity_events.try_recv() {
            if event == ConnectivityEvent::BecameOnline {
                report = Some(self.sync_now());
            }
        }
        report
    }

    /// Manual sync trigger; a no-op report while offline.
    pub fn sync_now(&mut self) -> SyncReport {
        self.coordinator.sync(&mut self.store, &self.connectivity)
    }

    /// Adds a blank household at `fix` and returns its id.
    pub fn capture_household(&mut self, fix: GeoFix) -> StoreResult<HouseholdId> {
        let household = new_household_at(fix, &self.surveyor_name, self.store.now());
        let id = household.id.clone();
        self.store.add(household)?;
        Ok(id)
    }

    /// Captures at the tracker's latest fix; `None` without a fix.
    pub fn capture_at_current_fix(&mut self) -> Option<StoreResult<HouseholdId>> {
        let fix = self.tracker.current_fix()?;
        Some(self.capture_household(fix))
    }

    /// Saves an edited household from the form panel.
    pub fn save_household(&mut self, household: Household) -> StoreResult<bool> {
        self.store.update(household)
    }
}
