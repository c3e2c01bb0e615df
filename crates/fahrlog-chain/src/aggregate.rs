//! Per-vehicle aggregate integrity digests.
//!
//! One digest per audit-protected vehicle, covering its canonical identity
//! record, every one of its trips (aggregate form, ascending by id), and
//! each trip's audit log entries (ascending by id) interleaved directly
//! after the trip they belong to. The digest is sensitive to every encoded
//! field and to insertion/removal of trips or audit entries, but not to the
//! relative order of different vehicles in a snapshot.
//!
//! Unlike chain verification, aggregate verification reports **all**
//! affected vehicles — it backs the restore-time audit report, where the
//! user needs the complete damage list, not a fast-fail.

use std::collections::BTreeMap;

use fahrlog_contracts::{audit::AuditLogEntry, trip::Trip, vehicle::Vehicle};
use fahrlog_core::digest::{Digest256, Sha256Digest};

use crate::canon::{encode_audit_entry, encode_for_aggregate, encode_vehicle};

/// Outcome of verifying a snapshot's stored aggregate digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateStatus {
    /// Every stored digest matches, or no digests were stored at all.
    Success,

    /// One or more vehicles' digests are absent or mismatched.
    TamperingDetected {
        /// Ids of all affected vehicles, ascending.
        vehicle_ids: Vec<i64>,
    },
}

impl AggregateStatus {
    /// True when verification found nothing wrong.
    pub fn is_success(&self) -> bool {
        matches!(self, AggregateStatus::Success)
    }
}

/// Computes and verifies per-vehicle aggregate integrity digests.
pub struct AggregateHasher {
    digest: Box<dyn Digest256>,
}

impl Default for AggregateHasher {
    fn default() -> Self {
        Self::new(Box::new(Sha256Digest))
    }
}

impl AggregateHasher {
    /// Create a hasher over a caller-supplied digest implementation.
    pub fn new(digest: Box<dyn Digest256>) -> Self {
        Self { digest }
    }

    /// Compute one digest per audit-protected vehicle.
    ///
    /// Non-protected vehicles never appear in the result; with no protected
    /// vehicles the map is empty. Trips are matched to vehicles by
    /// `vehicle_id` and sorted ascending by trip id before hashing, audit
    /// entries by `trip_id` sorted ascending by entry id.
    pub fn compute_hashes(
        &self,
        vehicles: &[Vehicle],
        trips: &[Trip],
        audit_logs: &[AuditLogEntry],
    ) -> BTreeMap<i64, String> {
        let mut digests = BTreeMap::new();

        for vehicle in vehicles.iter().filter(|v| v.audit_protected) {
            let mut input = encode_vehicle(vehicle);

            let mut own_trips: Vec<&Trip> = trips
                .iter()
                .filter(|t| t.vehicle_id == Some(vehicle.id))
                .collect();
            own_trips.sort_by_key(|t| t.id);

            for trip in own_trips {
                input.extend_from_slice(&encode_for_aggregate(trip));

                let mut entries: Vec<&AuditLogEntry> = audit_logs
                    .iter()
                    .filter(|e| e.trip_id == trip.id)
                    .collect();
                entries.sort_by_key(|e| e.id);

                for entry in entries {
                    input.extend_from_slice(&encode_audit_entry(entry));
                }
            }

            digests.insert(vehicle.id, self.digest.digest_hex(&input));
        }

        digests
    }

    /// Verify stored digests against a fresh recomputation.
    ///
    /// An empty `stored` map is unconditional `Success` — snapshots written
    /// before digests existed carry none, and their absence is not evidence
    /// of tampering. Stored ids with no matching vehicle object are
    /// silently ignored. A vehicle is affected when its recomputed digest
    /// is absent (e.g. no longer computable) or differs from the stored
    /// value; all affected vehicles are reported.
    pub fn verify_hashes(
        &self,
        stored: &BTreeMap<i64, String>,
        vehicles: &[Vehicle],
        trips: &[Trip],
        audit_logs: &[AuditLogEntry],
    ) -> AggregateStatus {
        if stored.is_empty() {
            return AggregateStatus::Success;
        }

        let current = self.compute_hashes(vehicles, trips, audit_logs);

        // BTreeMap iteration keeps the affected list ascending by id.
        let mut affected = Vec::new();
        for (vehicle_id, stored_hash) in stored {
            if !vehicles.iter().any(|v| v.id == *vehicle_id) {
                // The vehicle vanished entirely: nothing to compare, nothing
                // to report against.
                continue;
            }

            match current.get(vehicle_id) {
                Some(recomputed) if recomputed == stored_hash => {}
                _ => affected.push(*vehicle_id),
            }
        }

        if affected.is_empty() {
            AggregateStatus::Success
        } else {
            AggregateStatus::TamperingDetected {
                vehicle_ids: affected,
            }
        }
    }
}
