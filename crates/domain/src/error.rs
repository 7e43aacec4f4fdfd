//! Error types shared across the workspace.
//!
//! Each layer converts its own failures into [`CoinflipError`] via `#[from]`
//! so port signatures stay uniform.

/// Top-level error for every fallible port and service.
#[derive(Debug, thiserror::Error)]
pub enum CoinflipError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("conflict")]
    Conflict(#[from] ConflictError),
}

/// A domain invariant was violated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("config entry id must not be empty")]
    EmptyEntryId,

    #[error("entity id must look like `<platform>.<object_id>`, got {0:?}")]
    MalformedEntityId(String),

    #[error("unknown binary sensor device class {0:?}")]
    UnknownDeviceClass(String),

    #[error("invalid options for config entry {entry_id}: {reason}")]
    InvalidOptions { entry_id: String, reason: String },
}

/// A lookup did not match anything.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A registration collided with an existing one.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("an entity with unique id {unique_id:?} is already registered as {entity_id}")]
pub struct ConflictError {
    pub unique_id: String,
    pub entity_id: String,
}
