//! Core domain logic for offline-first household surveys.
//! This crate is the single source of truth for collection invariants.

pub mod clock;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SurveyConfig};
pub use connectivity::{ConnectivityEvent, ConnectivityMonitor};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::household::{
    Caste, EducationLevel, Gender, HouseType, Household, HouseholdId, HouseholdValidationError,
    IncomeBracket, Occupation, Resident, ResidentEmployment, SyncStatus,
};
pub use model::location::{GeoFix, MapBounds};
pub use service::capture::{GeolocationError, LocationTracker};
pub use service::household_store::{HouseholdStore, StoreError, StoreResult};
pub use service::search::{search_households, DEFAULT_SEARCH_LIMIT};
pub use service::summary::SurveySummary;
pub use session::SurveySession;
pub use store::kv::{KeyValueStore, KvError, MemoryKeyValueStore, SqliteKeyValueStore};
pub use store::local_store::{LocalStore, PersistenceError, HOUSEHOLDS_KEY, LAST_SYNC_KEY};
pub use sync::coordinator::{FailedRecord, SyncCoordinator, SyncOutcome, SyncReport};
pub use sync::reconciler::{
    AcknowledgeAllReconciler, ReconcileError, Reconciler, RecordOutcome, RecordStatus,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
