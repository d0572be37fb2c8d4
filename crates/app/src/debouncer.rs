//! Debouncer — throttles repeated alarms from one device pipeline.
//!
//! Within a cooldown window measured from the last forwarded alarm, further
//! alarms are dropped. There is no queueing and no trailing send when the
//! window expires.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use homeguard_domain::alarm::AlarmReason;
use homeguard_domain::id::DeviceId;

use crate::ports::AlarmSink;

/// Minimum time between two forwarded alarms of the same device.
pub const COOLDOWN: Duration = Duration::from_secs(1);

/// [`AlarmSink`] wrapper that forwards at most one alarm per [`COOLDOWN`].
pub struct Debouncer<S> {
    next: S,
    cooldown: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl<S: AlarmSink> Debouncer<S> {
    /// Wrap `next` with the fixed one-second cooldown.
    pub fn new(next: S) -> Self {
        Self {
            next,
            cooldown: COOLDOWN,
            last_sent: Mutex::new(None),
        }
    }

    /// Check-and-set under the lock so concurrent callers cannot both pass.
    fn allow_send(&self) -> bool {
        let mut last_sent = self.last_sent.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        match *last_sent {
            Some(at) if now.duration_since(at) < self.cooldown => false,
            _ => {
                *last_sent = Some(now);
                true
            }
        }
    }
}

impl<S: AlarmSink> AlarmSink for Debouncer<S> {
    fn alarm(&self, device: &DeviceId, reason: AlarmReason) {
        if !self.allow_send() {
            tracing::info!(%device, %reason, "alarm event received, but got debounced");
            return;
        }
        self.next.alarm(device, reason);
    }
}
