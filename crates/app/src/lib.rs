//! # coinflip-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** at the host/integration boundary:
//!   - `BinarySensorEntity` — what an integration hands the host to poll
//!   - `PlatformHost` — where an integration registers its entities
//!   - `EventPublisher` — where the host reports what happened
//! - Provide the in-memory `EntityRegistry`, the host side of
//!   `PlatformHost`, which owns every registered entity and polls it
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `coinflip-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
