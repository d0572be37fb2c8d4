//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors; adapters keep theirs local and
//! only log them on the event path.

use crate::id::DeviceId;

/// Invariant violations on domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Device identifiers must not be blank.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// Device identifiers end up in MQTT topics, where `#` and `+` are wildcards.
    #[error("device id {0:?} contains an MQTT wildcard")]
    ReservedCharacter(String),
}

/// A lookup for an unknown item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// The identifier that was not found.
    pub id: String,
}

/// Reasons a sensor payload could not be turned into a signal.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not valid JSON for the expected dialect.
    #[error("invalid payload")]
    InvalidJson(#[source] serde_json::Error),

    /// The availability payload named a state other than online/offline.
    #[error("unrecognized availability payload {0:?}")]
    UnknownAvailability(String),

    /// A required field is absent from an otherwise valid payload.
    #[error("payload is missing the {0:?} field")]
    MissingField(&'static str),
}

/// Reasons a state update was dropped before reaching its device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// The caller's deadline passed before the device accepted the update.
    #[error("deadline elapsed before device {0} accepted the update")]
    DeadlineElapsed(DeviceId),

    /// The device's processing loop has been shut down.
    #[error("device {0} is shut down")]
    Closed(DeviceId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Device",
            id: "frontdoor".to_string(),
        };
        assert_eq!(err.to_string(), "Device frontdoor not found");
    }

    #[test]
    fn should_display_unknown_availability_payload() {
        let err = DecodeError::UnknownAvailability("maybe".to_string());
        assert_eq!(
            err.to_string(),
            "unrecognized availability payload \"maybe\""
        );
    }

    #[test]
    fn should_name_missing_field() {
        let err = DecodeError::MissingField("contact");
        assert_eq!(err.to_string(), "payload is missing the \"contact\" field");
    }

    #[test]
    fn should_name_device_in_update_errors() {
        let id = DeviceId::new("frontdoor").unwrap();
        assert_eq!(
            UpdateError::Closed(id.clone()).to_string(),
            "device frontdoor is shut down"
        );
        assert_eq!(
            UpdateError::DeadlineElapsed(id).to_string(),
            "deadline elapsed before device frontdoor accepted the update"
        );
    }
}
