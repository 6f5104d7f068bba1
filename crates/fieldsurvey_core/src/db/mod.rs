//! SQLite file backing the survey key-value store.
//!
//! The whole household collection lives in one `kv_store` row, so the
//! schema stays small. Open errors surface as `KvError` like every other
//! storage failure.
//!
//! # Invariants
//! - A connection is handed out only after the storage schema is current.
//! - Schema version is `PRAGMA user_version`; newer files are refused.

pub mod migrations;
mod open;

pub use migrations::{latest_version, schema_version};
pub use open::{open_db, open_db_in_memory};
