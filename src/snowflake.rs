//! Snowflake identifiers.
//!
//! Discord IDs are snowflakes transmitted as strings in JSON. A snowflake is
//! time-ordered: its upper bits embed the creation timestamp, recoverable via
//! a fixed shift plus the platform epoch offset. The cache core only needs
//! equality/ordering for keys and this timestamp derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unix-millisecond offset of the Discord epoch (2015-01-01T00:00:00Z).
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// An opaque, time-ordered numeric string identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(String);

impl Snowflake {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty placeholder id (e.g. the guild wrapper for
    /// an interaction that arrived outside any guild).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unix-millisecond creation timestamp embedded in the snowflake, or
    /// `None` if the id is not a valid 64-bit number.
    ///
    /// `(id >> 22) + DISCORD_EPOCH_MS` — the shift is the same operation as
    /// the `id / 4_194_304` form in the API docs.
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .map(|sf| (sf >> 22) + DISCORD_EPOCH_MS)
    }

    /// Creation timestamp as a [`DateTime<Utc>`].
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms()
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
    }
}

// Numeric-string ordering: snowflakes never carry leading zeros, so a longer
// decimal string is always the larger number and same-length strings order
// lexicographically.
impl Ord for Snowflake {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0.len(), &self.0).cmp(&(other.0.len(), &other.0))
    }
}

impl PartialOrd for Snowflake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Snowflake {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Snowflake {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}
