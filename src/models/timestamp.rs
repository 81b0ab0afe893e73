//! Serde helpers for the backend's timestamp format.
//!
//! The backend emits naive `YYYY-MM-DD HH:MM:SS` strings which are
//! interpreted as UTC. RFC 3339 strings are accepted as well.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Wire format used by `/api/stock-data`.
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a backend timestamp.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, WIRE_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}
