//! Alarm reasons and the staleness threshold.

use std::fmt;

use chrono::TimeDelta;
use serde::Serialize;

/// Silence longer than this marks a device as stale.
pub const STALENESS_THRESHOLD: TimeDelta = TimeDelta::hours(26);

/// Why a device raised an alarm.
///
/// Variants are declared in priority order: when several conditions hold at
/// once, the first one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmReason {
    /// The contact sensor reports the door as open.
    Opened,
    /// The bridge reports the device as offline.
    Unavailable,
    /// Nothing was heard from the device for longer than [`STALENESS_THRESHOLD`].
    Stale,
}

impl AlarmReason {
    /// Human-readable message forwarded to the notification sink.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Unavailable => "unavailable",
            Self::Stale => "no messages received for a long time",
        }
    }
}

impl fmt::Display for AlarmReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
