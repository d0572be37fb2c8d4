//! Device updater port — how decoded sensor signals enter the core.

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;

/// Routes decoded signals to the device they belong to.
///
/// Both calls wait at most until `deadline` for the device to accept the
/// update. Failures (unknown device, deadline, shutdown) are logged by the
/// implementation and never returned.
pub trait DeviceUpdater: Send + Sync {
    /// Report whether `device` is reachable.
    fn set_availability(
        &self,
        deadline: Instant,
        device: &str,
        available: bool,
    ) -> impl Future<Output = ()> + Send;

    /// Report whether the door watched by `device` is open.
    fn set_opened(
        &self,
        deadline: Instant,
        device: &str,
        opened: bool,
    ) -> impl Future<Output = ()> + Send;
}

impl<T: DeviceUpdater + ?Sized> DeviceUpdater for Arc<T> {
    fn set_availability(
        &self,
        deadline: Instant,
        device: &str,
        available: bool,
    ) -> impl Future<Output = ()> + Send {
        (**self).set_availability(deadline, device, available)
    }

    fn set_opened(
        &self,
        deadline: Instant,
        device: &str,
        opened: bool,
    ) -> impl Future<Output = ()> + Send {
        (**self).set_opened(deadline, device, opened)
    }
}
