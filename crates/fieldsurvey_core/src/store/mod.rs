//! Durable local storage for the household collection.
//!
//! # Responsibility
//! - Model browser-style key-value storage behind `KeyValueStore`.
//! - Serialize the collection and last-sync timestamp under fixed keys.
//!
//! # Invariants
//! - A blob write replaces the previous value in one step; readers never
//!   observe a partial write.
//! - Persistence failures never propagate past `LocalStore`.

pub mod kv;
pub mod local_store;
