//! # coinflipd — coinflip daemon
//!
//! Composition root that wires the registry, the event bus and the random
//! integration together and runs the polling loop.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise logging
//! - Set up every configured binary sensor platform and config entry
//! - Poll registered entities on a fixed interval
//! - Unload everything on Ctrl+C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod host;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use coinflip_app::event_bus::InProcessEventBus;
use coinflip_app::services::entity_registry::EntityRegistry;

use config::Config;

const EVENT_BUS_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        interval_secs = config.polling.interval_secs,
        static_platforms = config.binary_sensors.len(),
        config_entries = config.config_entries.len(),
        "coinflipd starting"
    );

    let bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));
    let event_log = tokio::spawn(host::log_events(bus.subscribe()));
    let registry = EntityRegistry::new(Arc::clone(&bus));

    let registered = host::setup_integrations(&registry, &config).await;
    if registered == 0 {
        tracing::warn!("no entities configured, polling an empty registry");
    }

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received shutdown signal"),
            Err(err) => tracing::error!(error = %err, "failed to listen for shutdown signal"),
        }
    };
    let rounds = host::run_polling(&registry, config.poll_interval(), shutdown).await;
    tracing::info!(rounds, "polling stopped");

    let removed = registry
        .remove_all()
        .await
        .context("failed to unload entities")?;
    tracing::info!(removed, "coinflipd shutdown complete");

    drop(registry);
    drop(bus);
    event_log.await.context("event log task panicked")?;

    Ok(())
}
