//! Backup snapshot types.
//!
//! `BackupSnapshot` is the portion of the JSON backup envelope the
//! integrity engine operates on. General backup (de)serialization lives in
//! the application; the engine only needs the vehicles, trips, audit log,
//! and the per-vehicle aggregate digest map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{audit::AuditLogEntry, trip::Trip, vehicle::Vehicle};

/// A full data snapshot as exchanged through backup export/import.
///
/// `vehicle_integrity` maps a vehicle id to the lowercase hex aggregate
/// digest over that vehicle's trips and audit entries. The map may be
/// empty or entirely absent from the JSON — snapshots produced before the
/// integrity feature existed carry no digests, and their absence is never
/// grounds for rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSnapshot {
    /// All vehicles in the snapshot.
    pub vehicles: Vec<Vehicle>,

    /// All trips in the snapshot, across all vehicles.
    pub trips: Vec<Trip>,

    /// All audit log entries in the snapshot.
    pub audit_log: Vec<AuditLogEntry>,

    /// Per-vehicle aggregate integrity digests, keyed by vehicle id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vehicle_integrity: BTreeMap<i64, String>,
}
