//! Local Store: the persisted household blob and last-sync timestamp.
//!
//! # Responsibility
//! - Serialize the whole collection as one JSON array under a fixed key.
//! - Swallow and log persistence failures; callers keep in-memory state.
//!
//! # Invariants
//! - `save` either replaces the blob or leaves the previous blob intact.
//! - A blob larger than the configured quota is never written.

use crate::model::household::Household;
use crate::store::kv::{KeyValueStore, KvError};
use crate::model::timestamp::format_millis;
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON array of households.
pub const HOUSEHOLDS_KEY: &str = "population_dashboard_data";
/// Storage key holding the RFC 3339 last-sync timestamp.
pub const LAST_SYNC_KEY: &str = "population_dashboard_sync";

/// Persistence failure classes.
#[derive(Debug)]
pub enum PersistenceError {
    Serialization(serde_json::Error),
    Storage(KvError),
    QuotaExceeded { size_bytes: usize, quota_bytes: usize },
    InvalidTimestamp(String),
}

impl PersistenceError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "serialization_failed",
            Self::Storage(_) => "storage_failed",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization(err) => write!(f, "failed to (de)serialize households: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                size_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded: blob is {size_bytes} bytes, quota is {quota_bytes}"
            ),
            Self::InvalidTimestamp(value) => write!(f, "invalid last-sync timestamp `{value}`"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::InvalidTimestamp(_) => None,
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<KvError> for PersistenceError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Durable persistence of the household collection over a key-value backend.
pub struct LocalStore<K: KeyValueStore> {
    backend: K,
    quota_bytes: Option<usize>,
}

impl<K: KeyValueStore> LocalStore<K> {
    /// Creates a store without a size quota.
    pub fn new(backend: K) -> Self {
        Self {
            backend,
            quota_bytes: None,
        }
    }

    /// Rejects blobs larger than `quota_bytes` (`None` disables the check).
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Loads the persisted collection.
    ///
    /// Returns `None` when nothing is stored or the blob cannot be read; the
    /// failure is logged and the caller decides whether to seed.
    pub fn load(&self) -> Option<Vec<Household>> {
        match self.try_load() {
            Ok(households) => households,
            Err(err) => {
                error!(
                    "event=households_load module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                None
            }
        }
    }

    /// Fallible variant of [`LocalStore::load`].
    pub fn try_load(&self) -> Result<Option<Vec<Household>>, PersistenceError> {
        let Some(raw) = self.backend.get(HOUSEHOLDS_KEY)? else {
            debug!("event=households_load module=store status=empty");
            return Ok(None);
        };
        let households: Vec<Household> = serde_json::from_str(&raw)?;
        debug!(
            "event=households_load module=store status=ok count={}",
            households.len()
        );
        Ok(Some(households))
    }

    /// Serializes and overwrites the collection blob.
    ///
    /// Returns `false` on failure; the previous blob stays in place.
    pub fn save(&self, households: &[Household]) -> bool {
        match self.try_save(households) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=households_save module=store status=error count={} error_code={} error={}",
                    households.len(),
                    err.code(),
                    err
                );
                false
            }
        }
    }

    /// Fallible variant of [`LocalStore::save`].
    pub fn try_save(&self, households: &[Household]) -> Result<(), PersistenceError> {
        let blob = self.encode(households)?;
        self.backend.set(HOUSEHOLDS_KEY, &blob)?;
        debug!(
            "event=households_save module=store status=ok count={} bytes={}",
            households.len(),
            blob.len()
        );
        Ok(())
    }

    /// Writes the collection and the last sync time together.
    ///
    /// Returns `false` on failure; both previous values stay in place.
    pub fn save_synced(&self, households: &[Household], at: DateTime<Utc>) -> bool {
        match self.try_save_synced(households, at) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=sync_save module=store status=error count={} error_code={} error={}",
                    households.len(),
                    err.code(),
                    err
                );
                false
            }
        }
    }

    /// Fallible variant of [`LocalStore::save_synced`].
    pub fn try_save_synced(
        &self,
        households: &[Household],
        at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let blob = self.encode(households)?;
        let stamp = format_millis(at);
        self.backend
            .set_all(&[(HOUSEHOLDS_KEY, blob.as_str()), (LAST_SYNC_KEY, stamp.as_str())])?;
        debug!(
            "event=sync_save module=store status=ok count={} bytes={} at={}",
            households.len(),
            blob.len(),
            stamp
        );
        Ok(())
    }

    fn encode(&self, households: &[Household]) -> Result<String, PersistenceError> {
        let blob = serde_json::to_string(households)?;
        if let Some(quota_bytes) = self.quota_bytes {
            if blob.len() > quota_bytes {
                return Err(PersistenceError::QuotaExceeded {
                    size_bytes: blob.len(),
                    quota_bytes,
                });
            }
        }
        Ok(blob)
    }

    pub fn quota_bytes(&self) -> Option<usize> {
        self.quota_bytes
    }

    /// Last successful sync time, or `None` when never synced or unreadable.
    pub fn load_last_sync_time(&self) -> Option<DateTime<Utc>> {
        let loaded = self
            .backend
            .get(LAST_SYNC_KEY)
            .map_err(PersistenceError::from)
            .and_then(|raw| raw.map(|value| parse_timestamp(&value)).transpose());
        match loaded {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=last_sync_load module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                None
            }
        }
    }

    /// Persists the last successful sync time with millisecond precision.
    pub fn save_last_sync_time(&self, at: DateTime<Utc>) -> bool {
        let value = format_millis(at);
        match self.backend.set(LAST_SYNC_KEY, &value) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=last_sync_save module=store status=error error_code=storage_failed error={}",
                    err
                );
                false
            }
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| PersistenceError::InvalidTimestamp(value.to_string()))
}
