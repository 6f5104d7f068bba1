//! Persisted timestamp format.
//!
//! # Invariants
//! - Stored timestamps are RFC 3339 UTC with exactly three fractional
//!   digits and a `Z` suffix (`2026-06-10T07:00:00.123Z`).
//! - In-memory values are truncated to the same precision so a record
//!   compares equal after a save/load cycle.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serializer;

/// Drops sub-millisecond precision.
pub fn to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Formats `at` in the persisted wire form.
pub fn format_millis(at: DateTime<Utc>) -> String {
    to_millis(at).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter for `DateTime<Utc>` fields.
pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_millis(*at))
}
