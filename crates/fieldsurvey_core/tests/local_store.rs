use chrono::{TimeZone, Utc};
use fieldsurvey_core::db::{open_db, open_db_in_memory};
use fieldsurvey_core::{
    GeoFix, Household, KeyValueStore, KvError, LocalStore, MemoryKeyValueStore, PersistenceError,
    SqliteKeyValueStore, HOUSEHOLDS_KEY, LAST_SYNC_KEY,
};
use std::cell::Cell;

/// Memory backend whose writes can be switched off.
#[derive(Default)]
struct FlakyBackend {
    inner: MemoryKeyValueStore,
    fail_writes: Cell<bool>,
}

impl KeyValueStore for FlakyBackend {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        if self.fail_writes.get() {
            return Err(KvError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), KvError> {
        if self.fail_writes.get() {
            return Err(KvError::Unavailable("disk full".to_string()));
        }
        self.inner.set_all(entries)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.inner.remove(key)
    }
}

fn sample_pair() -> Vec<Household> {
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap();
    vec![
        Household::sample(now),
        Household::blank_at(GeoFix::new(19.076, 72.8777), "Agent 2", now),
    ]
}

#[test]
fn load_returns_none_when_nothing_is_stored() {
    let store = LocalStore::new(MemoryKeyValueStore::new());
    assert!(store.load().is_none());
    assert!(store.load_last_sync_time().is_none());
}

#[test]
fn save_then_load_roundtrips_collection() {
    let store = LocalStore::new(MemoryKeyValueStore::new());
    let households = sample_pair();

    assert!(store.save(&households));
    assert_eq!(store.load(), Some(households));
}

#[test]
fn persisted_empty_array_loads_as_empty_collection() {
    let store = LocalStore::new(MemoryKeyValueStore::new());
    assert!(store.save(&[]));
    assert_eq!(store.load(), Some(Vec::new()));
}

#[test]
fn corrupt_blob_is_swallowed_as_none() {
    let backend = MemoryKeyValueStore::new();
    backend.set(HOUSEHOLDS_KEY, "{ not an array").unwrap();
    let store = LocalStore::new(backend);

    assert!(store.load().is_none());
    assert!(matches!(
        store.try_load(),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn quota_exceeded_keeps_previous_blob() {
    let store = LocalStore::new(MemoryKeyValueStore::new()).with_quota(Some(4096));
    let small = sample_pair()[..1].to_vec();
    assert!(store.save(&small));

    let large: Vec<Household> = (0..20)
        .map(|_| sample_pair().remove(1))
        .collect();
    assert!(!store.save(&large));
    assert!(matches!(
        store.try_save(&large),
        Err(PersistenceError::QuotaExceeded { quota_bytes: 4096, .. })
    ));
    assert_eq!(store.load(), Some(small));
}

#[test]
fn backend_write_failure_is_reported_as_false() {
    let store = LocalStore::new(FlakyBackend::default());
    let households = sample_pair();
    assert!(store.save(&households));

    store.backend().fail_writes.set(true);
    assert!(!store.save(&[]));
    assert!(!store.save_last_sync_time(Utc::now()));
    assert_eq!(store.load(), Some(households));
}

#[test]
fn save_synced_writes_collection_and_time_together() {
    let store = LocalStore::new(MemoryKeyValueStore::new());
    let mut households = sample_pair();
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
        + chrono::Duration::microseconds(7_900);
    households[1].mark_synced();

    assert!(store.save_synced(&households, at));
    assert_eq!(store.load(), Some(households));
    assert_eq!(
        store.backend().get(LAST_SYNC_KEY).unwrap().as_deref(),
        Some("2026-05-01T12:00:00.007Z")
    );
}

#[test]
fn failed_save_synced_keeps_both_previous_values() {
    let store = LocalStore::new(FlakyBackend::default());
    let before = sample_pair();
    let first_sync = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
    assert!(store.save_synced(&before, first_sync));

    store.backend().fail_writes.set(true);
    let mut after = before.clone();
    after[1].mark_synced();
    assert!(!store.save_synced(&after, Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap()));

    assert_eq!(store.load(), Some(before));
    assert_eq!(store.load_last_sync_time(), Some(first_sync));
}

#[test]
fn oversized_save_synced_writes_neither_value() {
    let store = LocalStore::new(MemoryKeyValueStore::new()).with_quota(Some(64));
    assert!(matches!(
        store.try_save_synced(&sample_pair(), Utc::now()),
        Err(PersistenceError::QuotaExceeded { .. })
    ));
    assert!(store.load().is_none());
    assert!(store.load_last_sync_time().is_none());
}

#[test]
fn last_sync_time_roundtrips_with_millisecond_precision() {
    let store = LocalStore::new(MemoryKeyValueStore::new());
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
        + chrono::Duration::milliseconds(250);

    assert!(store.save_last_sync_time(at));
    assert_eq!(
        store.backend().get(LAST_SYNC_KEY).unwrap().as_deref(),
        Some("2026-05-01T12:00:00.250Z")
    );
    assert_eq!(store.load_last_sync_time(), Some(at));
}

#[test]
fn unreadable_last_sync_time_is_ignored() {
    let backend = MemoryKeyValueStore::new();
    backend.set(LAST_SYNC_KEY, "yesterday").unwrap();
    let store = LocalStore::new(backend);
    assert!(store.load_last_sync_time().is_none());
}

#[test]
fn sqlite_backend_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.db");
    let households = sample_pair();

    {
        let conn = open_db(&path).unwrap();
        let store = LocalStore::new(SqliteKeyValueStore::new(&conn));
        assert!(store.save(&households));
    }

    let conn = open_db(&path).unwrap();
    let store = LocalStore::new(SqliteKeyValueStore::new(&conn));
    assert_eq!(store.load(), Some(households));
}

#[test]
fn sqlite_backend_overwrites_single_row() {
    let conn = open_db_in_memory().unwrap();
    let store = LocalStore::new(SqliteKeyValueStore::new(&conn));
    assert!(store.save(&sample_pair()));
    assert!(store.save(&sample_pair()[..1]));

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM kv_store WHERE key = ?1;",
            [HOUSEHOLDS_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(store.load().map(|loaded| loaded.len()), Some(1));
}
