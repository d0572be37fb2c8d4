//! Door sensor data reports.

use serde::Deserialize;
use tokio::time::Instant;

use homeguard_app::ports::DeviceUpdater;
use homeguard_domain::error::DecodeError;

use super::MessageHandler;

/// Subset of a zigbee2mqtt contact-sensor report. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct DoorSensorPayload {
    /// `true` while the magnet is in place, i.e. the door is closed.
    contact: Option<bool>,
    battery: Option<f64>,
    linkquality: Option<f64>,
}

/// Decode a data payload into whether the door is open.
///
/// # Errors
///
/// [`DecodeError::InvalidJson`] for anything that is not a JSON object with
/// well-typed fields, [`DecodeError::MissingField`] when `contact` is absent.
pub fn decode_contact(payload: &[u8]) -> Result<bool, DecodeError> {
    let report: DoorSensorPayload =
        serde_json::from_slice(payload).map_err(DecodeError::InvalidJson)?;
    tracing::trace!(
        battery = ?report.battery,
        linkquality = ?report.linkquality,
        "door sensor report decoded"
    );
    let contact = report.contact.ok_or(DecodeError::MissingField("contact"))?;
    Ok(!contact)
}

/// Routes door sensor reports to [`DeviceUpdater::set_opened`].
pub struct DataHandler<U> {
    updater: U,
}

impl<U: DeviceUpdater> DataHandler<U> {
    /// Create a handler forwarding to `updater`.
    pub fn new(updater: U) -> Self {
        Self { updater }
    }
}

impl<U: DeviceUpdater> MessageHandler for DataHandler<U> {
    async fn handle(&self, deadline: Instant, device: &str, payload: &[u8]) {
        match decode_contact(payload) {
            Ok(opened) => self.updater.set_opened(deadline, device, opened).await,
            Err(err) => {
                tracing::error!(device, error = %err, "failed to decode door sensor message");
            }
        }
    }
}
