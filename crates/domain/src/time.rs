//! Timestamps carried by entity snapshots and events.

use chrono::{DateTime, Utc};

/// UTC instant; serialized as RFC 3339 in event payloads and snapshots.
pub type Timestamp = DateTime<Utc>;

/// Wall-clock time for a poll, a registration or an event.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
