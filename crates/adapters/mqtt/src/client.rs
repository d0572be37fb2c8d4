//! rumqttc transport and event-loop driver.
//!
//! [`MqttClient`] is the [`Transport`] the router subscribes through.
//! [`MqttEventLoop`] owns the connection: it must be running for
//! subscriptions to complete and messages to arrive.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Packet, Publish, QoS, SubAck,
    SubscribeReasonCode,
};
use tokio::sync::mpsc;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::handlers::MessageHandler;
use crate::router::{Delivery, TopicRouter, Transport};

/// Capacity of the request channel between client handles and the event loop.
const REQUEST_CAPACITY: usize = 64;

/// Pause after a connection error before polling again.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Client handle; cheap to share behind an `Arc`.
pub struct MqttClient {
    client: AsyncClient,
    subacks: tokio::sync::Mutex<mpsc::UnboundedReceiver<SubAck>>,
    subscriptions: Arc<Mutex<Vec<String>>>,
    subscribe_timeout: Duration,
}

/// Connection driver returned alongside an [`MqttClient`].
pub struct MqttEventLoop {
    eventloop: EventLoop,
    client: AsyncClient,
    subacks: mpsc::UnboundedSender<SubAck>,
    subscriptions: Arc<Mutex<Vec<String>>>,
}

impl MqttClient {
    /// Build a client for `config`. Nothing is sent until the event loop runs.
    #[must_use]
    pub fn new(config: &MqttConfig) -> (Self, MqttEventLoop) {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(config.keep_alive());
        options.set_manual_acks(true);
        if let Some((username, password)) = config.credentials() {
            options.set_credentials(username, password);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (suback_tx, suback_rx) = mpsc::unbounded_channel();
        let subscriptions = Arc::new(Mutex::new(Vec::new()));

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "MQTT client configured"
        );

        let handle = Self {
            client: client.clone(),
            subacks: tokio::sync::Mutex::new(suback_rx),
            subscriptions: Arc::clone(&subscriptions),
            subscribe_timeout: config.subscribe_timeout(),
        };
        let driver = MqttEventLoop {
            eventloop,
            client,
            subacks: suback_tx,
            subscriptions,
        };
        (handle, driver)
    }

    /// Ask the broker to close the connection.
    ///
    /// # Errors
    ///
    /// Fails when the event loop is no longer accepting requests.
    pub async fn disconnect(&self) -> Result<(), MqttError> {
        self.client.disconnect().await.map_err(MqttError::Client)
    }
}

impl Transport for MqttClient {
    async fn subscribe(&self, pattern: &str) -> Result<(), MqttError> {
        // One subscription in flight at a time, so the next SUBACK is ours.
        let mut subacks = self.subacks.lock().await;
        while subacks.try_recv().is_ok() {}

        self.client
            .subscribe(pattern, QoS::AtLeastOnce)
            .await
            .map_err(MqttError::Client)?;

        let suback = tokio::time::timeout(self.subscribe_timeout, subacks.recv())
            .await
            .map_err(|_| MqttError::SubscribeTimeout(pattern.to_string()))?
            .ok_or(MqttError::Disconnected)?;

        if suback
            .return_codes
            .iter()
            .any(|code| matches!(code, SubscribeReasonCode::Failure))
        {
            return Err(MqttError::SubscriptionRejected(pattern.to_string()));
        }

        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pattern.to_string());
        Ok(())
    }
}

impl MqttEventLoop {
    /// Poll the connection forever, handing each message to `router`.
    ///
    /// Messages are processed in broker order on a single dispatch task, so
    /// the connection keeps being polled while a device is slow and two
    /// reports for the same device are never swapped. Subscriptions are
    /// re-issued after a reconnect that did not resume the previous session.
    pub async fn run<T, D, A>(self, router: Arc<TopicRouter<T, D, A>>)
    where
        T: Transport + 'static,
        D: MessageHandler + 'static,
        A: MessageHandler + 'static,
    {
        let Self {
            mut eventloop,
            client,
            subacks,
            subscriptions,
        } = self;
        let (queue, pending) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch(router, pending));

        let mut connected_before = false;
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    tracing::info!(session_present = ack.session_present, "connected to MQTT broker");
                    if connected_before && !ack.session_present {
                        resubscribe(&client, &subscriptions);
                    }
                    connected_before = true;
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let delivery = RumqttDelivery::new(client.clone(), publish);
                    if queue.send(delivery).is_err() {
                        tracing::error!("message dispatcher stopped, leaving event loop");
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(suback))) => {
                    let _ = subacks.send(suback);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(error = %err, "MQTT event loop error");
                    tokio::time::sleep(RECONNECT_BACKOFF).await;
                }
            }
        }
        dispatcher.abort();
    }
}

/// Route queued deliveries one at a time, in arrival order.
async fn dispatch<T, D, A, M>(
    router: Arc<TopicRouter<T, D, A>>,
    mut pending: mpsc::UnboundedReceiver<M>,
) where
    T: Transport,
    D: MessageHandler,
    A: MessageHandler,
    M: Delivery,
{
    while let Some(delivery) = pending.recv().await {
        router.on_message(delivery).await;
    }
    tracing::debug!("message dispatcher stopped");
}

/// Queue the recorded subscriptions again without waiting on the request
/// channel, which only drains while the event loop is polled.
fn resubscribe(client: &AsyncClient, subscriptions: &Mutex<Vec<String>>) {
    let patterns = subscriptions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    for pattern in patterns {
        tracing::info!(pattern = %pattern, "resubscribing after reconnect");
        if let Err(err) = client.try_subscribe(&pattern, QoS::AtLeastOnce) {
            tracing::error!(pattern = %pattern, error = %err, "failed to resubscribe");
        }
    }
}

/// An inbound PUBLISH awaiting its manual acknowledgement.
pub struct RumqttDelivery {
    client: AsyncClient,
    topic: String,
    publish: Publish,
}

impl RumqttDelivery {
    fn new(client: AsyncClient, publish: Publish) -> Self {
        // Topics are UTF-8 on the wire.
        let topic = String::from_utf8_lossy(AsRef::<[u8]>::as_ref(&publish.topic)).into_owned();
        Self {
            client,
            topic,
            publish,
        }
    }
}

impl Delivery for RumqttDelivery {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn payload(&self) -> &[u8] {
        &self.publish.payload
    }

    async fn ack(self) {
        if let Err(err) = self.client.ack(&self.publish).await {
            tracing::warn!(topic = %self.topic, error = %err, "failed to acknowledge message");
        }
    }
}
