//! Last-modified timestamps.
//!
//! Reconciliation decisions are defined over whole seconds since the Unix
//! epoch, matching the `changed_at` stamp replica stores maintain. The type
//! is a thin ordered wrapper; it carries no timezone or sub-second data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A last-modified timestamp: seconds since the Unix epoch.
///
/// `ChangeTime::ZERO` doubles as "no baseline": every record compares
/// strictly newer than it, so nothing classifies as a deletion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ChangeTime(i64);

impl ChangeTime {
    /// The zero timestamp, used as the first-sync baseline.
    pub const ZERO: ChangeTime = ChangeTime(0);

    /// The current wall-clock time, truncated to seconds.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs();
        Self(secs as i64)
    }

    /// Builds a timestamp from raw seconds since the epoch.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the raw seconds since the epoch.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.0
    }

    /// Whether this is the zero timestamp.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ChangeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChangeTime {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}
