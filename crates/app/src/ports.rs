//! Port definitions — traits that sit between the host and integrations.
//!
//! They are defined here (in `app`) so that both the registry and the
//! adapter crates can depend on them without creating circular dependencies.

pub mod entity;
pub mod event_bus;
pub mod platform_host;

pub use entity::BinarySensorEntity;
pub use event_bus::EventPublisher;
pub use platform_host::PlatformHost;
