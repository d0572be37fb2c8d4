//! Notification sink selected from configuration.

use homeguard_adapter_telegram::{TelegramConfig, TelegramError, TelegramNotifier};
use homeguard_app::notifier::LogNotifier;
use homeguard_app::ports::Notifier;

/// Telegram when configured, otherwise the log.
pub enum AppNotifier {
    Log(LogNotifier),
    Telegram(TelegramNotifier),
}

impl AppNotifier {
    /// Pick the sink for `telegram`. Must run inside the tokio runtime.
    pub fn from_config(telegram: Option<&TelegramConfig>) -> Result<Self, TelegramError> {
        match telegram {
            Some(config) => TelegramNotifier::new(config).map(Self::Telegram),
            None => {
                tracing::warn!("telegram is not configured, notifications go to the log only");
                Ok(Self::Log(LogNotifier))
            }
        }
    }

    /// Flush pending deliveries.
    pub async fn shutdown(&self) {
        if let Self::Telegram(telegram) = self {
            telegram.shutdown().await;
        }
    }
}

impl Notifier for AppNotifier {
    fn notify(&self, source: &str, message: &str) {
        match self {
            Self::Log(log) => log.notify(source, message),
            Self::Telegram(telegram) => telegram.notify(source, message),
        }
    }
}
