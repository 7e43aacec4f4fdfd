//! # coinflip-domain
//!
//! Pure domain model for the coinflip home automation host.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Entities** (snapshots of binary sensors as the host sees them)
//! - Define **Device classes** (the fixed set of binary sensor tags)
//! - Define **Config entries** (dynamically created integration configs)
//! - Define **Events** (registration and state-change records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod config_entry;
pub mod device_class;
pub mod entity;
pub mod event;
