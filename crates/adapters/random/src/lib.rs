//! # coinflip-adapter-random
//!
//! The `random` integration: a binary sensor whose state is a coin flip,
//! redrawn every time the host polls it.
//!
//! ## Entry points
//!
//! | Function | Source of config | Unique id |
//! |----------|------------------|-----------|
//! | [`setup_platform`] | static `[[binary_sensor]]` block | none |
//! | [`setup_entry`] | dynamic [`ConfigEntry`] options | the entry id |
//!
//! Both hand exactly one sensor to the host and ask for an update before
//! it is added, so the first state the host records is already on or off.
//!
//! ## Dependency rule
//!
//! Depends on `coinflip-app` (port traits) and `coinflip-domain` only.

mod config;
mod sensor;
mod source;

pub use config::{DEFAULT_NAME, RandomBinarySensorConfig};
pub use sensor::RandomBinarySensor;
pub use source::{BitSource, RngBitSource};

use coinflip_app::ports::PlatformHost;
use coinflip_domain::config_entry::ConfigEntry;
use coinflip_domain::entity::Entity;
use coinflip_domain::error::CoinflipError;

/// Integration domain, matched against [`ConfigEntry::domain`].
pub const DOMAIN: &str = "random";

/// Set up a sensor from static platform configuration.
///
/// `discovery_info` is part of the platform setup signature but carries
/// nothing this integration uses.
///
/// # Errors
///
/// Returns a validation error for a blank name, or whatever the host
/// reports while registering.
pub async fn setup_platform(
    host: &impl PlatformHost,
    config: RandomBinarySensorConfig,
    _discovery_info: Option<&serde_json::Value>,
) -> Result<Entity, CoinflipError> {
    config.validate()?;
    tracing::debug!(name = %config.name, "setting up random binary sensor platform");
    let sensor = RandomBinarySensor::new(config, None);
    host.register_entity(Box::new(sensor), true).await
}

/// Set up a sensor from a config entry. The entry id becomes the sensor's
/// unique id.
///
/// # Errors
///
/// Returns a validation error when the entry id is blank or the options do
/// not match [`RandomBinarySensorConfig`], or whatever the host reports
/// while registering (e.g. a conflict when the entry was already set up).
pub async fn setup_entry(
    host: &impl PlatformHost,
    entry: &ConfigEntry,
) -> Result<Entity, CoinflipError> {
    entry.validate()?;
    let config: RandomBinarySensorConfig = entry.decode_options()?;
    config.validate()?;
    tracing::debug!(
        entry_id = %entry.entry_id,
        name = %config.name,
        "setting up random binary sensor entry"
    );
    let sensor = RandomBinarySensor::new(config, Some(entry.entry_id.clone()));
    host.register_entity(Box::new(sensor), true).await
}
