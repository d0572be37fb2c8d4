//! Topic router — filters inbound messages and hands them to a handler.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use homeguard_domain::id::DeviceId;

use crate::error::MqttError;
use crate::handlers::MessageHandler;
use crate::topic::{self, Route};

/// Lifetime of each message's downstream processing.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Subscription side of the broker connection.
pub trait Transport: Send + Sync {
    /// Subscribe to `pattern`, resolving once the broker has accepted it.
    fn subscribe(&self, pattern: &str) -> impl Future<Output = Result<(), MqttError>> + Send;
}

/// One inbound message that must be acknowledged exactly once.
pub trait Delivery: Send {
    /// Full topic the message was published on.
    fn topic(&self) -> &str;

    /// Raw payload.
    fn payload(&self) -> &[u8];

    /// Acknowledge receipt to the broker.
    fn ack(self) -> impl Future<Output = ()> + Send;
}

/// Routes zigbee2mqtt messages for allow-listed devices to the right handler.
pub struct TopicRouter<T, D, A> {
    transport: T,
    base_topic: String,
    allowed: HashSet<String>,
    data: D,
    availability: A,
}

impl<T, D, A> TopicRouter<T, D, A>
where
    T: Transport,
    D: MessageHandler,
    A: MessageHandler,
{
    /// Create a router for `devices` under `base_topic`.
    ///
    /// An empty allow-list is logged but accepted; such a router drops
    /// every message.
    pub fn new(
        transport: T,
        base_topic: impl Into<String>,
        devices: impl IntoIterator<Item = DeviceId>,
        data: D,
        availability: A,
    ) -> Self {
        let allowed: HashSet<String> = devices.into_iter().map(String::from).collect();
        if allowed.is_empty() {
            tracing::error!("no devices were enabled for zigbee2mqtt listener");
        }
        Self {
            transport,
            base_topic: base_topic.into(),
            allowed,
            data,
            availability,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Subscribe to every topic in the namespace.
    ///
    /// # Errors
    ///
    /// Propagates the transport error when the broker rejects or never
    /// acknowledges the subscription.
    pub async fn subscribe(&self) -> Result<(), MqttError> {
        let pattern = topic::wildcard(&self.base_topic);
        self.transport.subscribe(&pattern).await?;
        tracing::info!(pattern = %pattern, "subscribed to zigbee2mqtt topics");
        Ok(())
    }

    /// Route one inbound message, then acknowledge it whatever the outcome.
    pub async fn on_message(&self, delivery: impl Delivery) {
        let deadline = Instant::now() + DISPATCH_TIMEOUT;
        self.dispatch(deadline, delivery.topic(), delivery.payload())
            .await;
        delivery.ack().await;
    }

    async fn dispatch(&self, deadline: Instant, topic: &str, payload: &[u8]) {
        match topic::classify(&self.base_topic, topic) {
            Route::Bridge => {
                tracing::debug!(topic, "bridge state msg received, skip");
            }
            Route::Foreign => {
                tracing::debug!(topic, "message outside zigbee2mqtt namespace, skip");
            }
            Route::Availability(device) => {
                if self.is_allowed(device) {
                    self.availability.handle(deadline, device, payload).await;
                }
            }
            Route::Data(device) => {
                if self.is_allowed(device) {
                    self.data.handle(deadline, device, payload).await;
                }
            }
        }
    }

    fn is_allowed(&self, device: &str) -> bool {
        let allowed = self.allowed.contains(device);
        if !allowed {
            tracing::debug!(device, "device not allowed");
        }
        allowed
    }
}
