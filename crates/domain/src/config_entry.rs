//! Config entry — an integration configuration created at runtime rather
//! than written in the static config file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A host-persisted configuration for one integration instance.
///
/// `options` stays an untyped JSON object here; each integration decodes
/// it into its own schema with [`ConfigEntry::decode_options`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Stable id, reused as the unique id of the entities it creates.
    pub entry_id: String,
    /// Integration domain, e.g. `"random"`.
    pub domain: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl ConfigEntry {
    /// Create an entry with no title.
    #[must_use]
    pub fn new(
        entry_id: impl Into<String>,
        domain: impl Into<String>,
        options: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            domain: domain.into(),
            title: None,
            options,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntryId`] for a blank `entry_id`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entry_id.trim().is_empty() {
            return Err(ValidationError::EmptyEntryId);
        }
        Ok(())
    }

    /// Decode `options` into an integration's typed schema.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOptions`] when the options do not
    /// match `T`.
    pub fn decode_options<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        serde_json::from_value(serde_json::Value::Object(self.options.clone())).map_err(|err| {
            ValidationError::InvalidOptions {
                entry_id: self.entry_id.clone(),
                reason: err.to_string(),
            }
        })
    }
}
