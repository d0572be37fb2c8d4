//! # homeguardd — homeguard daemon
//!
//! Composition root that wires the door-sensor alarm core to its adapters.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Build the notifier, alarm gate and device registry
//! - Connect to MQTT and subscribe to zigbee2mqtt
//! - Serve the alarm control API over HTTP
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod notifier;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use homeguard_adapter_http_axum::state::AppState;
use homeguard_adapter_mqtt::{AvailabilityHandler, DataHandler, MqttClient, TopicRouter};
use homeguard_app::alarm_gate::AlarmGate;
use homeguard_app::registry::DeviceRegistry;

use crate::config::Config;
use crate::notifier::AppNotifier;

/// Upper bound on flushing queued notifications at exit.
const NOTIFIER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_logging(&config.logging.filter);

    let devices = config.device_ids()?;

    // Alarm path: device -> debouncer -> gate -> notifier
    let notifier = Arc::new(
        AppNotifier::from_config(config.telegram.as_ref())
            .context("failed to start telegram notifier")?,
    );
    let gate = Arc::new(AlarmGate::new(Arc::clone(&notifier)));
    let registry = Arc::new(DeviceRegistry::new(devices.clone(), Arc::clone(&gate)));
    registry.listen();
    let watched: Vec<_> = registry.device_ids().iter().map(ToString::to_string).collect();
    tracing::info!(devices = ?watched, "watching door sensors");

    // MQTT
    let (client, driver) = MqttClient::new(&config.mqtt);
    let router = Arc::new(TopicRouter::new(
        client,
        config.mqtt.base_topic.clone(),
        devices,
        DataHandler::new(Arc::clone(&registry)),
        AvailabilityHandler::new(Arc::clone(&registry)),
    ));
    let driver = tokio::spawn(driver.run(Arc::clone(&router)));
    router
        .subscribe()
        .await
        .context("failed to subscribe to zigbee2mqtt topics")?;

    // HTTP
    let app = homeguard_adapter_http_axum::router::build(AppState::new(Arc::clone(&gate)));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "homeguardd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("shutting down");
    if let Err(err) = router.transport().disconnect().await {
        tracing::debug!(error = %err, "MQTT disconnect failed");
    }
    driver.abort();
    registry.close();
    if tokio::time::timeout(NOTIFIER_DRAIN_TIMEOUT, notifier.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("gave up waiting for pending notifications");
    }
    Ok(())
}

/// Install the global `tracing` subscriber.
///
/// Timestamps are left out under systemd, whose journal adds its own.
fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt()
            .without_time()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
