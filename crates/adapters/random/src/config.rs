//! Random binary sensor configuration.

use serde::{Deserialize, Serialize};

use coinflip_domain::device_class::BinarySensorDeviceClass;
use coinflip_domain::error::ValidationError;

/// Name used when the configuration does not give one.
pub const DEFAULT_NAME: &str = "Random Binary Sensor";

/// Options accepted by both the static platform config and config entries.
///
/// Every key is optional. Unknown keys and unknown device classes are
/// rejected at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomBinarySensorConfig {
    pub name: String,
    pub device_class: Option<BinarySensorDeviceClass>,
}

impl Default for RandomBinarySensorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            device_class: None,
        }
    }
}

impl RandomBinarySensorConfig {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}
