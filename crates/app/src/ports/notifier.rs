//! Notifier port — best-effort delivery of a message to a human.

use std::sync::Arc;

/// Outbound notification sink (chat bot, log, …).
///
/// Implementations must not block for long and must never panic on delivery
/// failure: failures are logged by the sink and never surface to the caller.
/// Calls may arrive concurrently from several device loops.
pub trait Notifier: Send + Sync {
    /// Attempt to deliver `message` attributed to `source`.
    fn notify(&self, source: &str, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, source: &str, message: &str) {
        (**self).notify(source, message);
    }
}
