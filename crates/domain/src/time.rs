//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for `last_seen_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Build a whole-hours [`TimeDelta`].
#[must_use]
pub fn hours(count: i64) -> TimeDelta {
    TimeDelta::hours(count)
}
