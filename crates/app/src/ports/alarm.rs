//! Alarm ports — where device alarms flow, and how the gate is controlled.

use std::sync::Arc;

use homeguard_domain::alarm::AlarmReason;
use homeguard_domain::id::DeviceId;

/// Receives alarms raised by a device's evaluation loop.
pub trait AlarmSink: Send + Sync {
    /// Handle one alarm. Never fails from the caller's point of view.
    fn alarm(&self, device: &DeviceId, reason: AlarmReason);
}

impl<T: AlarmSink + ?Sized> AlarmSink for Arc<T> {
    fn alarm(&self, device: &DeviceId, reason: AlarmReason) {
        (**self).alarm(device, reason);
    }
}

/// Arm / disarm surface of the global alarm gate.
pub trait AlarmControl: Send + Sync {
    /// Whether alarms are currently forwarded.
    fn enabled(&self) -> bool;

    /// Arm the gate and announce it.
    fn enable(&self);

    /// Disarm the gate and announce it.
    fn disable(&self);
}

impl<T: AlarmControl + ?Sized> AlarmControl for Arc<T> {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn enable(&self) {
        (**self).enable();
    }

    fn disable(&self) {
        (**self).disable();
    }
}
