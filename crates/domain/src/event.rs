//! Event — an immutable record of something that happened to an entity.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityState};
use crate::id::{EntityId, EventId};
use crate::time::{Timestamp, now};

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    EntityRegistered,
    StateChanged,
    EntityRemoved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub entity_id: Option<EntityId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    #[must_use]
    pub fn new(
        event_type: EventType,
        entity_id: Option<EntityId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id,
            data,
            timestamp: now(),
        }
    }

    /// An entity joined the registry.
    #[must_use]
    pub fn entity_registered(entity: &Entity) -> Self {
        Self::new(
            EventType::EntityRegistered,
            Some(entity.id),
            serde_json::json!({
                "entity_id": entity.entity_id,
                "unique_id": entity.unique_id,
                "name": entity.friendly_name,
                "device_class": entity.device_class,
            }),
        )
    }

    /// `entity` moved from `from` to its current state.
    #[must_use]
    pub fn state_changed(entity: &Entity, from: EntityState) -> Self {
        Self::new(
            EventType::StateChanged,
            Some(entity.id),
            serde_json::json!({
                "entity_id": entity.entity_id,
                "from": from,
                "to": entity.state,
            }),
        )
    }

    /// An entity was unloaded.
    #[must_use]
    pub fn entity_removed(entity: &Entity) -> Self {
        Self::new(
            EventType::EntityRemoved,
            Some(entity.id),
            serde_json::json!({ "entity_id": entity.entity_id }),
        )
    }
}
