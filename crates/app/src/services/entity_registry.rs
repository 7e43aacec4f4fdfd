//! Entity registry — the in-memory host every integration registers with.
//!
//! The registry owns the live [`BinarySensorEntity`] objects together with
//! the host's [`Entity`] snapshot of each. [`EntityRegistry::poll`] is the
//! host side of the polling loop: it refreshes every entity, folds the new
//! readings into the snapshots and publishes the resulting events.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use coinflip_domain::entity::{BINARY_SENSOR_PLATFORM, Entity, EntityState, slugify};
use coinflip_domain::error::{CoinflipError, ConflictError, NotFoundError};
use coinflip_domain::event::Event;
use coinflip_domain::id::EntityId;
use coinflip_domain::time::now;

use crate::ports::{BinarySensorEntity, EventPublisher, PlatformHost};

struct Slot {
    sensor: Box<dyn BinarySensorEntity>,
    snapshot: Entity,
}

/// Outcome of a single [`EntityRegistry::poll`] round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollReport {
    pub polled: usize,
    pub changed: usize,
}

/// In-memory [`PlatformHost`] implementation.
///
/// The lock is never held across an `.await`: state is updated under the
/// lock, events are collected, and publishing happens afterwards.
pub struct EntityRegistry<EP> {
    slots: Mutex<HashMap<EntityId, Slot>>,
    publisher: EP,
}

impl<EP: EventPublisher> EntityRegistry<EP> {
    /// Create an empty registry reporting to `publisher`.
    pub fn new(publisher: EP) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            publisher,
        }
    }

    /// Refresh every registered entity once.
    ///
    /// # Errors
    ///
    /// Propagates a failure to publish a `StateChanged` event. Entity state
    /// is already updated when that happens.
    pub async fn poll(&self) -> Result<PollReport, CoinflipError> {
        let (polled, events) = {
            let mut slots = self.lock();
            let ts = now();
            let mut events = Vec::new();
            for slot in slots.values_mut() {
                slot.sensor.update();
                let from = slot.snapshot.state;
                let to = EntityState::from(slot.sensor.is_on());
                if slot.snapshot.update_state(to, ts) {
                    tracing::debug!(
                        entity_id = %slot.snapshot.entity_id,
                        %from,
                        %to,
                        "state changed"
                    );
                    events.push(Event::state_changed(&slot.snapshot, from));
                }
            }
            (slots.len(), events)
        };

        let report = PollReport {
            polled,
            changed: events.len(),
        };
        self.publisher.publish_all(events).await?;
        tracing::trace!(polled = report.polled, changed = report.changed, "poll done");
        Ok(report)
    }

    /// Look up an entity snapshot by registry id.
    ///
    /// # Errors
    ///
    /// Returns [`CoinflipError::NotFound`] when nothing is registered under `id`.
    pub fn get(&self, id: EntityId) -> Result<Entity, CoinflipError> {
        self.lock()
            .get(&id)
            .map(|slot| slot.snapshot.clone())
            .ok_or_else(|| not_found(id))
    }

    /// Find the entity an integration registered with `unique_id`.
    #[must_use]
    pub fn find_by_unique_id(&self, unique_id: &str) -> Option<Entity> {
        self.lock()
            .values()
            .find(|slot| slot.snapshot.unique_id.as_deref() == Some(unique_id))
            .map(|slot| slot.snapshot.clone())
    }

    /// All snapshots, ordered by `entity_id`.
    #[must_use]
    pub fn list(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .lock()
            .values()
            .map(|slot| slot.snapshot.clone())
            .collect();
        entities.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Unload one entity, dropping the integration's sensor.
    ///
    /// # Errors
    ///
    /// Returns [`CoinflipError::NotFound`] for an unknown `id`, or a
    /// publishing failure.
    pub async fn remove(&self, id: EntityId) -> Result<Entity, CoinflipError> {
        let removed = self.lock().remove(&id).ok_or_else(|| not_found(id))?;
        tracing::info!(entity_id = %removed.snapshot.entity_id, "entity removed");
        self.publisher
            .publish(Event::entity_removed(&removed.snapshot))
            .await?;
        Ok(removed.snapshot)
    }

    /// Unload every entity. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Propagates the first publishing failure.
    pub async fn remove_all(&self) -> Result<usize, CoinflipError> {
        let removed: Vec<Slot> = self.lock().drain().map(|(_, slot)| slot).collect();
        let events: Vec<Event> = removed
            .iter()
            .map(|slot| {
                tracing::info!(entity_id = %slot.snapshot.entity_id, "entity removed");
                Event::entity_removed(&slot.snapshot)
            })
            .collect();
        self.publisher.publish_all(events).await?;
        Ok(removed.len())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EntityId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self, sensor: Box<dyn BinarySensorEntity>) -> Result<Entity, CoinflipError> {
        let mut slots = self.lock();

        if let Some(unique_id) = sensor.unique_id() {
            let existing = slots
                .values()
                .find(|slot| slot.snapshot.unique_id.as_deref() == Some(unique_id));
            if let Some(existing) = existing {
                return Err(ConflictError {
                    unique_id: unique_id.to_string(),
                    entity_id: existing.snapshot.entity_id.clone(),
                }
                .into());
            }
        }

        let entity = Entity::builder()
            .entity_id(free_entity_id(&slots, sensor.name()))
            .unique_id(sensor.unique_id().map(str::to_string))
            .friendly_name(sensor.name())
            .device_class(sensor.device_class())
            .state(EntityState::from(sensor.is_on()))
            .build()?;

        slots.insert(
            entity.id,
            Slot {
                sensor,
                snapshot: entity.clone(),
            },
        );
        Ok(entity)
    }
}

impl<EP: EventPublisher> PlatformHost for EntityRegistry<EP> {
    fn register_entity(
        &self,
        mut entity: Box<dyn BinarySensorEntity>,
        update_before_add: bool,
    ) -> impl Future<Output = Result<Entity, CoinflipError>> + Send {
        async move {
            if update_before_add {
                entity.update();
            }
            let entity = self.admit(entity)?;
            tracing::info!(
                entity_id = %entity.entity_id,
                unique_id = entity.unique_id.as_deref(),
                device_class = entity.device_class.map(|class| class.as_str()),
                state = %entity.state,
                "entity registered"
            );

            let mut events = vec![Event::entity_registered(&entity)];
            if entity.state.is_known() {
                events.push(Event::state_changed(&entity, EntityState::Unknown));
            }
            self.publisher.publish_all(events).await?;
            Ok(entity)
        }
    }
}

/// `binary_sensor.<slug>`, suffixed `_2`, `_3`, … while taken.
fn free_entity_id(slots: &HashMap<EntityId, Slot>, name: &str) -> String {
    let base = format!("{BINARY_SENSOR_PLATFORM}.{}", slugify(name));
    let taken = |candidate: &str| {
        slots
            .values()
            .any(|slot| slot.snapshot.entity_id == candidate)
    };
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

fn not_found(id: EntityId) -> CoinflipError {
    NotFoundError {
        entity: "Entity",
        id: id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::event_bus::InProcessEventBus;
    use coinflip_domain::device_class::BinarySensorDeviceClass;
    use coinflip_domain::error::ValidationError;
    use coinflip_domain::event::EventType;
    use tokio::sync::broadcast;

    /// Replays a fixed list of readings, then repeats the last one.
    struct ScriptedSensor {
        name: String,
        unique_id: Option<String>,
        device_class: Option<BinarySensorDeviceClass>,
        readings: VecDeque<bool>,
        is_on: Option<bool>,
        updates: Arc<AtomicUsize>,
    }

    impl ScriptedSensor {
        fn new(name: &str, readings: &[bool]) -> Self {
            Self {
                name: name.to_string(),
                unique_id: None,
                device_class: None,
                readings: readings.iter().copied().collect(),
                is_on: None,
                updates: Arc::default(),
            }
        }

        fn with_unique_id(mut self, unique_id: &str) -> Self {
            self.unique_id = Some(unique_id.to_string());
            self
        }
    }

    impl BinarySensorEntity for ScriptedSensor {
        fn name(&self) -> &str {
            &self.name
        }

        fn unique_id(&self) -> Option<&str> {
            self.unique_id.as_deref()
        }

        fn device_class(&self) -> Option<BinarySensorDeviceClass> {
            self.device_class
        }

        fn is_on(&self) -> Option<bool> {
            self.is_on
        }

        fn update(&mut self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if let Some(next) = self.readings.pop_front() {
                self.is_on = Some(next);
            }
        }
    }

    fn registry() -> (
        EntityRegistry<Arc<InProcessEventBus>>,
        broadcast::Receiver<Event>,
    ) {
        let bus = Arc::new(InProcessEventBus::new(64));
        let rx = bus.subscribe();
        (EntityRegistry::new(bus), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<EventType> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event.event_type);
        }
        seen
    }

    #[tokio::test]
    async fn should_update_once_before_add_when_requested() {
        let (registry, _rx) = registry();
        let sensor = ScriptedSensor::new("Coin", &[true]);
        let updates = Arc::clone(&sensor.updates);

        let entity = registry
            .register_entity(Box::new(sensor), true)
            .await
            .unwrap();

        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(entity.state, EntityState::On);
        assert_eq!(entity.entity_id, "binary_sensor.coin");
    }

    #[tokio::test]
    async fn should_register_unknown_state_without_update_before_add() {
        let (registry, mut rx) = registry();
        let entity = registry
            .register_entity(Box::new(ScriptedSensor::new("Coin", &[true])), false)
            .await
            .unwrap();

        assert_eq!(entity.state, EntityState::Unknown);
        assert_eq!(drain(&mut rx), vec![EventType::EntityRegistered]);
    }

    #[tokio::test]
    async fn should_publish_initial_state_after_registration() {
        let (registry, mut rx) = registry();
        registry
            .register_entity(Box::new(ScriptedSensor::new("Coin", &[false])), true)
            .await
            .unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![EventType::EntityRegistered, EventType::StateChanged]
        );
    }

    #[tokio::test]
    async fn should_reject_duplicate_unique_id() {
        let (registry, _rx) = registry();
        registry
            .register_entity(
                Box::new(ScriptedSensor::new("Coin", &[true]).with_unique_id("entry-1")),
                true,
            )
            .await
            .unwrap();

        let result = registry
            .register_entity(
                Box::new(ScriptedSensor::new("Other", &[true]).with_unique_id("entry-1")),
                true,
            )
            .await;

        assert!(matches!(
            result,
            Err(CoinflipError::Conflict(ConflictError { ref entity_id, .. }))
                if entity_id == "binary_sensor.coin"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn should_suffix_colliding_entity_ids() {
        let (registry, _rx) = registry();
        let sensors: Vec<Box<dyn BinarySensorEntity>> = vec![
            Box::new(ScriptedSensor::new("Coin", &[true])),
            Box::new(ScriptedSensor::new("Coin", &[true])),
            Box::new(ScriptedSensor::new("coin!", &[true])),
        ];
        let entities = registry.add_entities(sensors, false).await.unwrap();

        let ids: Vec<&str> = entities.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "binary_sensor.coin",
                "binary_sensor.coin_2",
                "binary_sensor.coin_3"
            ]
        );
    }

    #[tokio::test]
    async fn should_reject_blank_name() {
        let (registry, _rx) = registry();
        let result = registry
            .register_entity(Box::new(ScriptedSensor::new("  ", &[true])), false)
            .await;
        assert!(matches!(
            result,
            Err(CoinflipError::Validation(ValidationError::EmptyName))
        ));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn should_publish_state_changed_only_when_reading_changes() {
        let (registry, mut rx) = registry();
        registry
            .register_entity(
                Box::new(ScriptedSensor::new("Coin", &[true, true, false])),
                true,
            )
            .await
            .unwrap();
        drain(&mut rx);

        let first = registry.poll().await.unwrap();
        assert_eq!(first, PollReport { polled: 1, changed: 0 });
        assert!(drain(&mut rx).is_empty());

        let second = registry.poll().await.unwrap();
        assert_eq!(second, PollReport { polled: 1, changed: 1 });
        assert_eq!(drain(&mut rx), vec![EventType::StateChanged]);
    }

    #[tokio::test]
    async fn should_keep_snapshot_in_sync_after_poll() {
        let (registry, _rx) = registry();
        let entity = registry
            .register_entity(Box::new(ScriptedSensor::new("Coin", &[false, true])), true)
            .await
            .unwrap();

        registry.poll().await.unwrap();

        let fetched = registry.get(entity.id).unwrap();
        assert_eq!(fetched.state, EntityState::On);
        assert!(fetched.last_changed >= entity.last_changed);
    }

    #[tokio::test]
    async fn should_poll_nothing_when_empty() {
        let (registry, _rx) = registry();
        assert_eq!(registry.poll().await.unwrap(), PollReport::default());
    }

    #[tokio::test]
    async fn should_find_entity_by_unique_id() {
        let (registry, _rx) = registry();
        registry
            .register_entity(
                Box::new(ScriptedSensor::new("Coin", &[true]).with_unique_id("entry-1")),
                true,
            )
            .await
            .unwrap();

        let found = registry.find_by_unique_id("entry-1").unwrap();
        assert_eq!(found.friendly_name, "Coin");
        assert!(registry.find_by_unique_id("entry-2").is_none());
    }

    #[tokio::test]
    async fn should_list_entities_sorted_by_entity_id() {
        let (registry, _rx) = registry();
        for name in ["Zebra", "Apple", "Mango"] {
            registry
                .register_entity(Box::new(ScriptedSensor::new(name, &[true])), false)
                .await
                .unwrap();
        }

        let names: Vec<String> = registry
            .list()
            .into_iter()
            .map(|e| e.friendly_name)
            .collect();
        assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
    }

    #[tokio::test]
    async fn should_forget_removed_entity() {
        let (registry, mut rx) = registry();
        let entity = registry
            .register_entity(Box::new(ScriptedSensor::new("Coin", &[true])), false)
            .await
            .unwrap();
        drain(&mut rx);

        registry.remove(entity.id).await.unwrap();

        assert!(matches!(
            registry.get(entity.id),
            Err(CoinflipError::NotFound(_))
        ));
        assert_eq!(drain(&mut rx), vec![EventType::EntityRemoved]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_removing_unknown_entity() {
        let (registry, _rx) = registry();
        let result = registry.remove(EntityId::new()).await;
        assert!(matches!(result, Err(CoinflipError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_remove_all_entities() {
        let (registry, _rx) = registry();
        for name in ["One", "Two"] {
            registry
                .register_entity(Box::new(ScriptedSensor::new(name, &[true])), false)
                .await
                .unwrap();
        }

        assert_eq!(registry.remove_all().await.unwrap(), 2);
        assert!(registry.is_empty());
    }
}
