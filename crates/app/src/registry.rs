//! Device registry — the fixed set of watched sensors, addressed by id.
//!
//! The set is built once at start-up from configuration and never changes.
//! Lookups of unknown ids are logged and dropped.

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use homeguard_domain::device::StateUpdate;
use homeguard_domain::error::{NotFoundError, UpdateError};
use homeguard_domain::id::DeviceId;

use crate::debouncer::Debouncer;
use crate::device::Device;
use crate::ports::{AlarmSink, Clock, DeviceUpdater, SystemClock};

/// Owns one [`Device`] per configured id, each behind its own [`Debouncer`].
pub struct DeviceRegistry<S, C = SystemClock> {
    devices: HashMap<DeviceId, Device<Debouncer<S>, C>>,
}

impl<S: AlarmSink + Clone + 'static> DeviceRegistry<S> {
    /// Build a device for every id. Duplicate ids collapse into one device.
    pub fn new(ids: impl IntoIterator<Item = DeviceId>, sink: S) -> Self {
        Self::with_clock(ids, sink, SystemClock)
    }
}

impl<S, C> DeviceRegistry<S, C>
where
    S: AlarmSink + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Same as [`new`](DeviceRegistry::new), reading the time from `clock`.
    pub fn with_clock(ids: impl IntoIterator<Item = DeviceId>, sink: S, clock: C) -> Self {
        let devices = ids
            .into_iter()
            .map(|id| {
                let device =
                    Device::with_clock(id.clone(), Debouncer::new(sink.clone()), clock.clone());
                (id, device)
            })
            .collect();
        Self { devices }
    }

    /// Start every device's processing task.
    pub fn listen(&self) -> Vec<JoinHandle<()>> {
        let handles: Vec<_> = self.devices.values().filter_map(Device::listen).collect();
        tracing::info!(devices = self.devices.len(), "device loops started");
        handles
    }

    /// Shut every device down. Safe to call more than once.
    pub fn close(&self) {
        for device in self.devices.values() {
            device.close();
        }
        tracing::info!("device registry closed");
    }

    /// Configured device ids, sorted.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<_> = self.devices.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn get(&self, name: &str) -> Result<&Device<Debouncer<S>, C>, NotFoundError> {
        self.devices.get(name).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: name.to_string(),
        })
    }

    async fn dispatch(&self, deadline: Instant, name: &str, update: StateUpdate) {
        let operation = update.operation();
        let device = match self.get(name) {
            Ok(device) => device,
            Err(err) => {
                tracing::error!(device = name, operation, error = %err, "device not found");
                return;
            }
        };
        let result = match update {
            StateUpdate::Availability(available) => {
                device.set_availability(deadline, available).await
            }
            StateUpdate::Opened(opened) => device.set_opened(deadline, opened).await,
        };
        match result {
            Ok(()) => {}
            Err(UpdateError::DeadlineElapsed(_)) => {
                tracing::error!(device = name, operation, "device state update timeout");
            }
            Err(UpdateError::Closed(_)) => {
                tracing::debug!(device = name, operation, "device is shut down, update dropped");
            }
        }
    }
}

impl<S, C> DeviceUpdater for DeviceRegistry<S, C>
where
    S: AlarmSink + Clone + 'static,
    C: Clock + Clone + 'static,
{
    async fn set_availability(&self, deadline: Instant, device: &str, available: bool) {
        self.dispatch(deadline, device, StateUpdate::Availability(available))
            .await;
    }

    async fn set_opened(&self, deadline: Instant, device: &str, opened: bool) {
        self.dispatch(deadline, device, StateUpdate::Opened(opened))
            .await;
    }
}
