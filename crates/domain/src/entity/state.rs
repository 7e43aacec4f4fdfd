//! Entity state — what the host reports for a binary sensor.

use serde::{Deserialize, Serialize};

/// Discrete state of a binary sensor entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
}

impl EntityState {
    /// Whether the state carries an actual reading.
    #[must_use]
    pub fn is_known(self) -> bool {
        matches!(self, Self::On | Self::Off)
    }
}

/// `None` is a sensor that has not produced a reading yet.
impl From<Option<bool>> for EntityState {
    fn from(is_on: Option<bool>) -> Self {
        match is_on {
            Some(true) => Self::On,
            Some(false) => Self::Off,
            None => Self::Unknown,
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
