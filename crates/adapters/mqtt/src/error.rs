//! MQTT adapter error types.

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client could not queue a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The broker answered the subscription with a failure code.
    #[error("broker rejected subscription to {0}")]
    SubscriptionRejected(String),

    /// No subscription acknowledgement arrived in time.
    #[error("timed out waiting for broker to acknowledge subscription to {0}")]
    SubscribeTimeout(String),

    /// The event loop is no longer running.
    #[error("MQTT event loop stopped")]
    Disconnected,
}
