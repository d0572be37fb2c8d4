//! # homeguard-adapter-telegram
//!
//! Telegram adapter — implements the [`Notifier`] port by posting to a chat
//! through the Bot API.
//!
//! Delivery is best-effort: `notify` only enqueues, a background worker
//! sends with a bounded number of retries, and failures end in a log line.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `homeguard-app` and `homeguard-domain`.
//!
//! [`Notifier`]: homeguard_app::ports::Notifier

mod config;
mod error;
mod notifier;

pub use config::TelegramConfig;
pub use error::TelegramError;
pub use notifier::TelegramNotifier;
