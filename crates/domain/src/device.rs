//! Device state — the continuously-updated record kept for each sensor.
//!
//! There are no named states: the record is three fields, and the alarm
//! policy in [`DeviceState::evaluate`] reads them in priority order after
//! every update.

use crate::alarm::{AlarmReason, STALENESS_THRESHOLD};
use crate::time::Timestamp;

/// A single change requested by the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    /// The bridge reported the device online (`true`) or offline (`false`).
    Availability(bool),
    /// The contact sensor reported the door open (`true`) or closed (`false`).
    Opened(bool),
}

impl StateUpdate {
    /// Short operation name used in log fields.
    #[must_use]
    pub fn operation(self) -> &'static str {
        match self {
            Self::Availability(_) => "set_availability",
            Self::Opened(_) => "set_opened",
        }
    }
}

/// Mutable state of one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    /// Whether the device is reachable. Assumed `true` until reported otherwise.
    pub available: bool,
    /// Whether the door is open.
    pub is_open: bool,
    /// When the last update was applied; `None` before the first one.
    pub last_seen_at: Option<Timestamp>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            available: true,
            is_open: false,
            last_seen_at: None,
        }
    }
}

impl DeviceState {
    /// Apply `update` received at `now` and return the alarm it raises, if any.
    ///
    /// Staleness is judged on the silence that preceded this update, so the
    /// previous `last_seen_at` is evaluated before being refreshed to `now`.
    pub fn apply(&mut self, update: StateUpdate, now: Timestamp) -> Option<AlarmReason> {
        match update {
            StateUpdate::Availability(available) => self.available = available,
            StateUpdate::Opened(opened) => self.is_open = opened,
        }
        let reason = self.evaluate(now);
        self.last_seen_at = Some(now);
        reason
    }

    /// Evaluate the alarm policy against the current fields.
    ///
    /// First match wins: open, then unavailable, then stale.
    #[must_use]
    pub fn evaluate(&self, now: Timestamp) -> Option<AlarmReason> {
        if self.is_open {
            return Some(AlarmReason::Opened);
        }
        if !self.available {
            return Some(AlarmReason::Unavailable);
        }
        if self.is_stale(now) {
            return Some(AlarmReason::Stale);
        }
        None
    }

    /// Whether more than [`STALENESS_THRESHOLD`] passed since the last update.
    #[must_use]
    pub fn is_stale(&self, now: Timestamp) -> bool {
        self.last_seen_at
            .is_some_and(|seen| seen < now - STALENESS_THRESHOLD)
    }
}
