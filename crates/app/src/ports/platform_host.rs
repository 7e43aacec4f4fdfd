//! Platform host port — where integrations hand over the entities they build.
//!
//! An integration's setup functions receive a `&impl PlatformHost` and call
//! [`register_entity`](PlatformHost::register_entity) once per entity. The
//! host then owns the entity, polls it, and tracks its state. The
//! integration never sees the host's internals.

use std::future::Future;

use coinflip_domain::entity::Entity;
use coinflip_domain::error::CoinflipError;

use crate::ports::BinarySensorEntity;

pub trait PlatformHost: Send + Sync {
    /// Take ownership of `entity` and start tracking it.
    ///
    /// With `update_before_add` the host refreshes the entity once before
    /// recording it, so the first reported state is a real reading.
    /// Returns the host's snapshot of the registered entity.
    fn register_entity(
        &self,
        entity: Box<dyn BinarySensorEntity>,
        update_before_add: bool,
    ) -> impl Future<Output = Result<Entity, CoinflipError>> + Send;

    /// Register several entities in order, stopping at the first failure.
    fn add_entities(
        &self,
        entities: Vec<Box<dyn BinarySensorEntity>>,
        update_before_add: bool,
    ) -> impl Future<Output = Result<Vec<Entity>, CoinflipError>> + Send {
        async move {
            let mut registered = Vec::with_capacity(entities.len());
            for entity in entities {
                registered.push(self.register_entity(entity, update_before_add).await?);
            }
            Ok(registered)
        }
    }
}

impl<T: PlatformHost> PlatformHost for std::sync::Arc<T> {
    fn register_entity(
        &self,
        entity: Box<dyn BinarySensorEntity>,
        update_before_add: bool,
    ) -> impl Future<Output = Result<Entity, CoinflipError>> + Send {
        (**self).register_entity(entity, update_before_add)
    }
}
