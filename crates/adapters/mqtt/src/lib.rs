//! # homeguard-adapter-mqtt
//!
//! MQTT adapter — listens to zigbee2mqtt and feeds door-sensor signals into
//! the homeguard core.
//!
//! ## How it works
//!
//! The [`TopicRouter`] subscribes to `<base_topic>/#`, drops bridge traffic
//! and devices outside the allow-list, and passes the rest to one of two
//! [`MessageHandler`]s:
//!
//! | Topic | Handler | Payload |
//! |-------|---------|---------|
//! | `<base>/<device>/availability` | [`AvailabilityHandler`] | `online`, `offline`, `{"state":"online"}` |
//! | `<base>/<device>` | [`DataHandler`] | `{"contact": true}` (closed) / `false` (open) |
//!
//! Every message is acknowledged after routing, whether or not it was
//! usable, and each gets a fresh five second processing deadline.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `homeguard-app` and `homeguard-domain`.

mod client;
mod config;
mod error;
pub mod handlers;
mod router;
pub mod topic;

pub use client::{MqttClient, MqttEventLoop, RumqttDelivery};
pub use config::MqttConfig;
pub use error::MqttError;
pub use handlers::{AvailabilityHandler, DataHandler, MessageHandler};
pub use router::{DISPATCH_TIMEOUT, Delivery, TopicRouter, Transport};
