//! Host-side services.

pub mod entity_registry;
