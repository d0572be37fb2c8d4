//! Telegram adapter error types.

/// Errors specific to the Telegram adapter.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The HTTP client could not be set up.
    #[error("failed to build telegram HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response, timeouts included.
    #[error("telegram request failed")]
    Http(#[source] reqwest::Error),

    /// The Bot API answered with a non-success status.
    #[error("telegram API returned {status}: {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body, if any.
        description: String,
    },
}

impl TelegramError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Client(_) => false,
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
        }
    }
}
