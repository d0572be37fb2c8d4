//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homeguard.toml` in the working directory (or the path in
//! `HOMEGUARD_CONFIG`). Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use serde::Deserialize;

use homeguard_adapter_mqtt::MqttConfig;
use homeguard_adapter_telegram::TelegramConfig;
use homeguard_domain::error::ValidationError;
use homeguard_domain::id::DeviceId;

/// Default config file name, relative to the working directory.
const DEFAULT_PATH: &str = "homeguard.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// MQTT broker settings.
    pub mqtt: MqttConfig,
    /// Watched devices.
    pub alarm: AlarmConfig,
    /// Telegram notifications; log-only when absent.
    pub telegram: Option<TelegramConfig>,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Alarm configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// zigbee2mqtt friendly names of the door sensors to watch.
    pub devices: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present), then apply
    /// environment-variable overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, an override
    /// cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMEGUARD_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("HOMEGUARD_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("HOMEGUARD_PORT") {
            self.server.port = parse_env("HOMEGUARD_PORT", &val)?;
        }
        if let Some(val) = lookup("MQTT_BROKER_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = lookup("MQTT_BROKER_PORT") {
            self.mqtt.broker_port = parse_env("MQTT_BROKER_PORT", &val)?;
        }
        if let Some(val) = lookup("MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = lookup("MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }
        if let Some(val) = lookup("Z2M_DEVICES") {
            self.alarm.devices = val
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(val) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram.get_or_insert_with(TelegramConfig::default).bot_token = val;
        }
        if let Some(val) = lookup("TELEGRAM_CHAT_ID") {
            self.telegram.get_or_insert_with(TelegramConfig::default).chat_id =
                parse_env("TELEGRAM_CHAT_ID", &val)?;
        }
        if let Some(val) = lookup("HOMEGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if let Some(telegram) = &self.telegram {
            if telegram.bot_token.is_empty() {
                return Err(ConfigError::Validation(
                    "telegram bot_token must not be empty".to_string(),
                ));
            }
            if telegram.chat_id == 0 {
                return Err(ConfigError::Validation(
                    "telegram chat_id must be set".to_string(),
                ));
            }
            if telegram.request_timeout_secs == 0 {
                return Err(ConfigError::Validation(
                    "telegram request_timeout_secs must be non-zero".to_string(),
                ));
            }
        }
        self.device_ids()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Parse the configured device names.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or one containing a topic wildcard.
    pub fn device_ids(&self) -> Result<Vec<DeviceId>, ConfigError> {
        self.alarm
            .devices
            .iter()
            .map(|name| DeviceId::new(name).map_err(ConfigError::Device))
            .collect()
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        name,
        value: value.to_string(),
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,homeguardd=info,homeguard=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {name}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
    /// A configured device name is not a usable identifier.
    #[error("invalid device name")]
    Device(#[source] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
