//! Fallback notifier that only writes to the log.

use crate::ports::Notifier;

/// [`Notifier`] used when no chat integration is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, source: &str, message: &str) {
        tracing::warn!(source, message, "notification");
    }
}
