//! MQTT broker configuration.

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for the zigbee2mqtt broker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Broker user name. Credentials are only sent when both halves are set.
    pub username: Option<String>,
    /// Broker password.
    pub password: Option<String>,
    /// Namespace zigbee2mqtt publishes under.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// How long to wait for the broker to acknowledge a subscription, in seconds.
    pub subscribe_timeout_secs: u16,
}

impl MqttConfig {
    /// Keep-alive interval as a [`Duration`].
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    /// Subscription acknowledgement timeout as a [`Duration`].
    #[must_use]
    pub fn subscribe_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.subscribe_timeout_secs))
    }

    /// User name and password, when both are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "homeguard".to_string(),
            username: None,
            password: None,
            base_topic: "zigbee2mqtt".to_string(),
            keep_alive_secs: 30,
            subscribe_timeout_secs: 10,
        }
    }
}
