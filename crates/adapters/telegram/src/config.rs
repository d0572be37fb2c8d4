//! Telegram bot configuration.

use std::time::Duration;

use serde::Deserialize;

/// Credentials and delivery settings for the Telegram notifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub bot_token: String,
    /// Chat the notifications are posted to.
    pub chat_id: i64,
    /// Bot API base URL.
    pub api_url: String,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Upper bound on a single API request, connect included.
    pub request_timeout_secs: u64,
}

impl TelegramConfig {
    /// Full `sendMessage` endpoint for this bot.
    #[must_use]
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: 0,
            api_url: "https://api.telegram.org".to_string(),
            max_retries: 3,
            request_timeout_secs: 10,
        }
    }
}
