//! Message handlers — one per payload dialect.
//!
//! Each handler pairs a pure decoder (bytes to signal) with a call into the
//! [`DeviceUpdater`](homeguard_app::ports::DeviceUpdater) port. Decode
//! failures are logged and swallowed.

mod availability;
mod data;

pub use availability::{AvailabilityHandler, decode_availability};
pub use data::{DataHandler, decode_contact};

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;

/// Something that consumes the payload of one routed message.
pub trait MessageHandler: Send + Sync {
    /// Handle `payload` received for `device`, finishing before `deadline`.
    fn handle(
        &self,
        deadline: Instant,
        device: &str,
        payload: &[u8],
    ) -> impl Future<Output = ()> + Send;
}

impl<T: MessageHandler + ?Sized> MessageHandler for Arc<T> {
    fn handle(
        &self,
        deadline: Instant,
        device: &str,
        payload: &[u8],
    ) -> impl Future<Output = ()> + Send {
        (**self).handle(deadline, device, payload)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use homeguard_app::ports::DeviceUpdater;
    use tokio::time::Instant;

    /// Call recorded by [`RecordingUpdater`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Availability(String, bool),
        Opened(String, bool),
    }

    #[derive(Default)]
    pub struct RecordingUpdater {
        pub calls: Mutex<Vec<Call>>,
    }

    impl RecordingUpdater {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DeviceUpdater for RecordingUpdater {
        async fn set_availability(&self, _deadline: Instant, device: &str, available: bool) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Availability(device.to_string(), available));
        }

        async fn set_opened(&self, _deadline: Instant, device: &str, opened: bool) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Opened(device.to_string(), opened));
        }
    }
}
