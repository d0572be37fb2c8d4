//! Availability reports.
//!
//! zigbee2mqtt has published two dialects over time: a bare `online` /
//! `offline` string and a JSON object `{"state": "online"}`. Both are
//! accepted, as is a JSON string.

use serde::Deserialize;
use tokio::time::Instant;

use homeguard_app::ports::DeviceUpdater;
use homeguard_domain::error::DecodeError;

use super::MessageHandler;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AvailabilityState {
    Online,
    Offline,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AvailabilityPayload {
    Structured { state: AvailabilityState },
    Bare(AvailabilityState),
}

impl AvailabilityPayload {
    fn is_online(&self) -> bool {
        let (Self::Structured { state } | Self::Bare(state)) = self;
        matches!(state, AvailabilityState::Online)
    }
}

/// Decode an availability payload into `true` (online) or `false` (offline).
///
/// # Errors
///
/// [`DecodeError::InvalidJson`] when the payload is neither a bare state nor
/// JSON, [`DecodeError::UnknownAvailability`] for JSON naming any other state.
pub fn decode_availability(payload: &[u8]) -> Result<bool, DecodeError> {
    match payload.trim_ascii() {
        b"online" => return Ok(true),
        b"offline" => return Ok(false),
        _ => {}
    }
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(DecodeError::InvalidJson)?;
    AvailabilityPayload::deserialize(&value)
        .map(|decoded| decoded.is_online())
        .map_err(|_| DecodeError::UnknownAvailability(value.to_string()))
}

/// Routes availability reports to [`DeviceUpdater::set_availability`].
pub struct AvailabilityHandler<U> {
    updater: U,
}

impl<U: DeviceUpdater> AvailabilityHandler<U> {
    /// Create a handler forwarding to `updater`.
    pub fn new(updater: U) -> Self {
        Self { updater }
    }
}

impl<U: DeviceUpdater> MessageHandler for AvailabilityHandler<U> {
    async fn handle(&self, deadline: Instant, device: &str, payload: &[u8]) {
        match decode_availability(payload) {
            Ok(available) => {
                self.updater
                    .set_availability(deadline, device, available)
                    .await;
            }
            Err(err) => {
                tracing::error!(
                    device,
                    payload = %String::from_utf8_lossy(payload),
                    error = %err,
                    "failed to parse device availability"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::handlers::testing::{Call, RecordingUpdater};

    #[test]
    fn should_decode_bare_strings() {
        assert!(decode_availability(b"online").unwrap());
        assert!(!decode_availability(b"offline").unwrap());
    }

    #[test]
    fn should_decode_structured_payloads() {
        assert!(decode_availability(br#"{"state":"online"}"#).unwrap());
        assert!(!decode_availability(br#"{"state": "offline"}"#).unwrap());
    }

    #[test]
    fn should_decode_json_strings() {
        assert!(decode_availability(br#""online""#).unwrap());
    }

    #[test]
    fn should_reject_unknown_state() {
        let err = decode_availability(br#"{"state":"sleeping"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownAvailability(_)));
    }

    #[test]
    fn should_reject_garbage() {
        let err = decode_availability(b"maybe").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
    }

    #[test]
    fn should_be_case_sensitive() {
        assert!(decode_availability(b"ONLINE").is_err());
    }

    #[tokio::test]
    async fn should_forward_decoded_availability() {
        let updater = Arc::new(RecordingUpdater::default());
        let handler = AvailabilityHandler::new(Arc::clone(&updater));
        let deadline = Instant::now() + Duration::from_secs(5);

        handler.handle(deadline, "frontdoor", b"offline").await;
        handler
            .handle(deadline, "frontdoor", br#"{"state":"online"}"#)
            .await;

        assert_eq!(
            updater.calls(),
            vec![
                Call::Availability("frontdoor".to_string(), false),
                Call::Availability("frontdoor".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn should_not_forward_undecodable_payload() {
        let updater = Arc::new(RecordingUpdater::default());
        let handler = AvailabilityHandler::new(Arc::clone(&updater));

        handler
            .handle(Instant::now() + Duration::from_secs(5), "frontdoor", b"{}")
            .await;

        assert!(updater.calls().is_empty());
    }
}
