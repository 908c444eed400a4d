//! Millisecond timestamps for the batch result model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Milliseconds since the Unix epoch. The zero value means "unset".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TimeMs(i64);

impl TimeMs {
    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Convert from a chrono timestamp.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Create from a raw millisecond value.
    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Raw milliseconds since the epoch.
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whether the timestamp is unset.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Sub for TimeMs {
    type Output = i64;

    fn sub(self, earlier: TimeMs) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for TimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
