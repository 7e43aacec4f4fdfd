//! Host wiring — turns configuration into registered entities and drives
//! the polling loop.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};

use coinflip_adapter_random as random;
use coinflip_app::ports::{EventPublisher, PlatformHost};
use coinflip_app::services::entity_registry::EntityRegistry;
use coinflip_domain::event::{Event, EventType};

use crate::config::{BinarySensorPlatform, Config};

/// Set up every configured platform block and config entry.
///
/// A failing block is logged and skipped so one bad entry does not keep
/// the others from loading. Returns how many entities were registered.
pub async fn setup_integrations(host: &impl PlatformHost, config: &Config) -> usize {
    let mut registered = 0;

    for platform in &config.binary_sensors {
        let result = match platform {
            BinarySensorPlatform::Random(options) => {
                random::setup_platform(host, options.clone(), None).await
            }
        };
        match result {
            Ok(entity) => {
                registered += 1;
                tracing::info!(entity_id = %entity.entity_id, "binary_sensor platform loaded");
            }
            Err(err) => tracing::error!(error = ?err, "binary_sensor platform failed to load"),
        }
    }

    for entry in &config.config_entries {
        if entry.domain != random::DOMAIN {
            tracing::warn!(
                entry_id = %entry.entry_id,
                domain = %entry.domain,
                "no integration for config entry domain, skipping"
            );
            continue;
        }
        match random::setup_entry(host, entry).await {
            Ok(entity) => {
                registered += 1;
                tracing::info!(
                    entry_id = %entry.entry_id,
                    entity_id = %entity.entity_id,
                    "config entry loaded"
                );
            }
            Err(err) => tracing::error!(
                entry_id = %entry.entry_id,
                error = ?err,
                "config entry failed to load"
            ),
        }
    }

    registered
}

/// Poll `registry` every `period` until `shutdown` resolves.
///
/// The first round fires one `period` after start, since setup already
/// refreshed every entity once. Returns the number of completed rounds.
pub async fn run_polling<EP: EventPublisher>(
    registry: &EntityRegistry<EP>,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) -> u64 {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut shutdown = std::pin::pin!(shutdown);
    let mut rounds = 0;

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                match registry.poll().await {
                    Ok(report) => tracing::debug!(
                        polled = report.polled,
                        changed = report.changed,
                        "polling round complete"
                    ),
                    Err(err) => tracing::warn!(error = ?err, "polling round failed"),
                }
                rounds += 1;
            }
        }
    }

    rounds
}

/// Log bus traffic until the bus goes away.
pub async fn log_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let entity_id = event.data["entity_id"].as_str().unwrap_or("?");
                match event.event_type {
                    EventType::StateChanged => tracing::info!(
                        entity_id,
                        from = event.data["from"].as_str(),
                        to = event.data["to"].as_str(),
                        "state changed"
                    ),
                    EventType::EntityRegistered | EventType::EntityRemoved => {
                        tracing::debug!(entity_id, kind = ?event.event_type, "registry event");
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
