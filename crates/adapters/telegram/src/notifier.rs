//! Queued Telegram delivery.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use homeguard_app::ports::Notifier;

use crate::config::TelegramConfig;
use crate::error::TelegramError;

/// Messages waiting for the worker. Beyond this, new ones are dropped.
const QUEUE_CAPACITY: usize = 64;

/// Base delay between attempts; multiplied by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    description: Option<String>,
}

/// [`Notifier`] that posts to a Telegram chat from a background task.
///
/// Must be created inside a tokio runtime.
pub struct TelegramNotifier {
    queue: Mutex<Option<mpsc::Sender<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TelegramNotifier {
    /// Start the delivery worker for `config`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        Self::with_timing(config, config.request_timeout(), RETRY_BACKOFF)
    }

    fn with_timing(
        config: &TelegramConfig,
        timeout: Duration,
        backoff: Duration,
    ) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TelegramError::Client)?;
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let client = BotClient {
            http,
            url: config.send_message_url(),
            chat_id: config.chat_id,
            max_retries: config.max_retries,
            backoff,
        };
        let worker = tokio::spawn(client.run(rx));
        tracing::info!(chat_id = config.chat_id, "telegram notifier started");
        Ok(Self {
            queue: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Stop accepting messages and wait for the queue to drain.
    pub async fn shutdown(&self) {
        drop(
            self.queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                tracing::error!(error = %err, "telegram worker failed");
            }
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, source: &str, message: &str) {
        let text = format_message(source, message);
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queue) = queue.as_ref() else {
            tracing::warn!(source, message, "telegram notifier is shut down, message dropped");
            return;
        };
        match queue.try_send(text) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(source, message, "telegram queue full, message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(source, message, "telegram worker stopped, message dropped");
            }
        }
    }
}

/// Text posted to the chat for one notification.
fn format_message(source: &str, message: &str) -> String {
    format!("🚨 {source}: {message}")
}

struct BotClient {
    http: reqwest::Client,
    url: String,
    chat_id: i64,
    max_retries: u32,
    backoff: Duration,
}

impl BotClient {
    async fn run(self, mut queue: mpsc::Receiver<String>) {
        while let Some(text) = queue.recv().await {
            if let Err(err) = self.deliver(&text).await {
                tracing::error!(error = %err, "telegram message delivery failed");
            }
        }
        tracing::debug!("telegram worker stopped");
    }

    async fn deliver(&self, text: &str) -> Result<(), TelegramError> {
        let mut attempt = 0;
        loop {
            match self.send(text).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %err, "telegram delivery failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, text: &str) -> Result<(), TelegramError> {
        let response = self
            .http
            .post(&self.url)
            .json(&SendMessage {
                chat_id: self.chat_id,
                text,
            })
            .send()
            .await
            // The URL carries the bot token.
            .map_err(|err| TelegramError::Http(err.without_url()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let description = response
            .json::<ApiResponse>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_default();
        Err(TelegramError::Api {
            status: status.as_u16(),
            description,
        })
    }
}
