//! Audit log entries — one record per field-level trip change.
//!
//! Entries are produced by the application whenever a protected trip is
//! edited. The integrity engine never writes them; it only folds them into
//! the per-vehicle aggregate digest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of one field-level change to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Storage-assigned identifier, monotonically increasing.
    pub id: i64,

    /// The trip whose field changed.
    pub trip_id: i64,

    /// Name of the changed field.
    pub field_name: String,

    /// Value before the change, if any.
    pub old_value: Option<String>,

    /// Value after the change, if any.
    pub new_value: Option<String>,

    /// Instant the change was recorded.
    pub changed_at: DateTime<Utc>,
}
