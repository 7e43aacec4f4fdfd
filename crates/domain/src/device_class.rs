//! Binary sensor device classes.
//!
//! The set is fixed by the host: a configuration naming any other tag is
//! rejected before an entity is ever built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! device_classes {
    ($($variant:ident => $tag:literal,)*) => {
        /// Semantic hint for what `on` means on a binary sensor
        /// (motion detected, door open, moisture present, …).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum BinarySensorDeviceClass {
            $($variant,)*
        }

        impl BinarySensorDeviceClass {
            /// Every known device class, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The wire tag, e.g. `"garage_door"`.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)*
                }
            }
        }

        impl FromStr for BinarySensorDeviceClass {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)*
                    other => Err(ValidationError::UnknownDeviceClass(other.to_string())),
                }
            }
        }
    };
}

device_classes! {
    Battery => "battery",
    BatteryCharging => "battery_charging",
    CarbonMonoxide => "carbon_monoxide",
    Cold => "cold",
    Connectivity => "connectivity",
    Door => "door",
    GarageDoor => "garage_door",
    Gas => "gas",
    Heat => "heat",
    Light => "light",
    Lock => "lock",
    Moisture => "moisture",
    Motion => "motion",
    Moving => "moving",
    Occupancy => "occupancy",
    Opening => "opening",
    Plug => "plug",
    Power => "power",
    Presence => "presence",
    Problem => "problem",
    Running => "running",
    Safety => "safety",
    Smoke => "smoke",
    Sound => "sound",
    Tamper => "tamper",
    Update => "update",
    Vibration => "vibration",
    Window => "window",
}

impl fmt::Display for BinarySensorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_tag() {
        assert_eq!(
            "moisture".parse::<BinarySensorDeviceClass>(),
            Ok(BinarySensorDeviceClass::Moisture)
        );
    }

    #[test]
    fn should_reject_unknown_tag() {
        assert_eq!(
            "teleport".parse::<BinarySensorDeviceClass>(),
            Err(ValidationError::UnknownDeviceClass("teleport".to_string()))
        );
    }

    #[test]
    fn should_agree_with_serde_for_every_variant() {
        for class in BinarySensorDeviceClass::ALL {
            let json = serde_json::to_value(class).unwrap();
            assert_eq!(json.as_str(), Some(class.as_str()));
            assert_eq!(class.as_str().parse::<BinarySensorDeviceClass>(), Ok(*class));
        }
    }

    #[test]
    fn should_display_multi_word_tag_in_snake_case() {
        assert_eq!(
            BinarySensorDeviceClass::CarbonMonoxide.to_string(),
            "carbon_monoxide"
        );
    }
}
