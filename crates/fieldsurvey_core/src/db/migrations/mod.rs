//! Storage schema steps.
//!
//! # Invariants
//! - Steps are listed in ascending version order and never edited once shipped.
//! - All pending steps land in one transaction with the version bump.

use crate::store::kv::{KvError, KvResult};
use log::info;
use rusqlite::Connection;

/// One schema step; `version` is what `user_version` reads after it runs.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Storage schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the open database file.
pub fn schema_version(conn: &Connection) -> KvResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings the storage schema up to `latest_version`.
///
/// # Errors
/// - `KvError::SchemaTooNew` when the file is ahead of this build; the file
///   is left untouched so an upgraded app can still read it.
pub fn apply_migrations(conn: &mut Connection) -> KvResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(KvError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=storage_schema module=db status=applied version={} step={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
