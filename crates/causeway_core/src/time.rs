//! Time types for Causeway.
//!
//! History ordering uses logical time. Wall clock timestamps are metadata
//! only and never enter a fingerprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical time - monotonically increasing counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalTime(u64);

impl LogicalTime {
    /// Create a new logical time at zero
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create from raw value
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Create incremented time
    #[must_use]
    pub fn incremented(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for LogicalTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Wall clock timestamp - for metadata only, not for commitment logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch
    pub seconds: i64,
    /// Sub-second nanoseconds
    pub nanos: u32,
}

impl Timestamp {
    /// Create a new timestamp
    #[must_use]
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Get current timestamp (for metadata only)
    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Convert to a chrono datetime, if representable
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanos: value.timestamp_subsec_nanos(),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}.{:09}", self.seconds, self.nanos),
        }
    }
}
