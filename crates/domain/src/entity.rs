//! Entity — the host's snapshot of a single binary sensor.
//!
//! Integrations own the live sensor; the host keeps an [`Entity`] per
//! registered sensor and refreshes it after every poll.

mod state;

pub use state::EntityState;

use serde::{Deserialize, Serialize};

use crate::device_class::BinarySensorDeviceClass;
use crate::error::ValidationError;
use crate::id::EntityId;
use crate::time::{Timestamp, now};

/// Platform prefix for every entity id produced by this host.
pub const BINARY_SENSOR_PLATFORM: &str = "binary_sensor";

/// Snapshot of a registered binary sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Human-facing id, e.g. `binary_sensor.coin`.
    pub entity_id: String,
    /// Stable identity supplied by the integration, if any.
    pub unique_id: Option<String>,
    pub friendly_name: String,
    pub device_class: Option<BinarySensorDeviceClass>,
    pub state: EntityState,
    pub last_changed: Timestamp,
    pub last_updated: Timestamp,
}

impl Entity {
    /// Start building an entity.
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check the invariants the builder enforces.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] or
    /// [`ValidationError::MalformedEntityId`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.friendly_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let well_formed = self
            .entity_id
            .split_once('.')
            .is_some_and(|(platform, object_id)| {
                is_slug(platform) && is_slug(object_id)
            });
        if !well_formed {
            return Err(ValidationError::MalformedEntityId(self.entity_id.clone()));
        }
        Ok(())
    }

    /// Record a new state reading taken at `ts`.
    ///
    /// `last_updated` always moves; `last_changed` only moves when the
    /// state differs. Returns whether the state changed.
    pub fn update_state(&mut self, state: EntityState, ts: Timestamp) -> bool {
        self.last_updated = ts;
        if self.state == state {
            return false;
        }
        self.state = state;
        self.last_changed = ts;
        true
    }
}

/// Builder for [`Entity`]; `entity_id` and `friendly_name` are required.
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<String>,
    unique_id: Option<String>,
    friendly_name: Option<String>,
    device_class: Option<BinarySensorDeviceClass>,
    state: EntityState,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn unique_id(mut self, unique_id: Option<String>) -> Self {
        self.unique_id = unique_id;
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_class(mut self, device_class: Option<BinarySensorDeviceClass>) -> Self {
        self.device_class = device_class;
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    /// Assemble and validate the entity.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a required field is missing or
    /// malformed.
    pub fn build(self) -> Result<Entity, ValidationError> {
        let ts = now();
        let entity = Entity {
            id: EntityId::new(),
            entity_id: self.entity_id.unwrap_or_default(),
            unique_id: self.unique_id,
            friendly_name: self.friendly_name.ok_or(ValidationError::EmptyName)?,
            device_class: self.device_class,
            state: self.state,
            last_changed: ts,
            last_updated: ts,
        };
        entity.validate()?;
        Ok(entity)
    }
}

/// Turn a display name into an object id: lowercase ASCII alphanumerics
/// separated by single underscores.
///
/// ```
/// use coinflip_domain::entity::slugify;
///
/// assert_eq!(slugify("Random Binary Sensor"), "random_binary_sensor");
/// assert_eq!(slugify("  Coin -- Flip! "), "coin_flip");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unnamed");
    }
    slug
}

fn is_slug(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
