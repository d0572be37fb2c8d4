//! Global alarm gate — a single armed flag in front of the notifier.
//!
//! The gate starts armed on every process start and is never persisted.
//! While disarmed, incoming alarms are dropped for good: nothing is queued
//! or replayed when the gate is armed again.

use std::sync::atomic::{AtomicBool, Ordering};

use homeguard_domain::alarm::AlarmReason;
use homeguard_domain::id::DeviceId;

use crate::ports::{AlarmControl, AlarmSink, Notifier};

/// Source name used when the gate announces its own transitions.
pub const GATE_SOURCE: &str = "alarm";

/// Armed/disarmed flag that forwards alarms to a [`Notifier`] while armed.
pub struct AlarmGate<N> {
    notifier: N,
    armed: AtomicBool,
}

impl<N: Notifier> AlarmGate<N> {
    /// Create an armed gate in front of `notifier`.
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            armed: AtomicBool::new(true),
        }
    }
}

impl<N: Notifier> AlarmControl for AlarmGate<N> {
    fn enabled(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Announces on every call, even when already armed.
    fn enable(&self) {
        self.armed.store(true, Ordering::SeqCst);
        tracing::info!("alarm enabled");
        self.notifier.notify(GATE_SOURCE, "enabled");
    }

    /// Announces on every call, even when already disarmed.
    fn disable(&self) {
        self.armed.store(false, Ordering::SeqCst);
        tracing::info!("alarm disabled");
        self.notifier.notify(GATE_SOURCE, "disabled");
    }
}

impl<N: Notifier> AlarmSink for AlarmGate<N> {
    fn alarm(&self, device: &DeviceId, reason: AlarmReason) {
        if self.enabled() {
            tracing::warn!(%device, %reason, "alarm raised");
            self.notifier.notify(device.as_str(), reason.message());
        } else {
            tracing::debug!(%device, %reason, "alarm event received, but will be ignored: alarm disabled");
        }
    }
}
