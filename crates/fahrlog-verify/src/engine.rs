//! The backup import verifier.
//!
//! `ImportVerifier` is the accept/reject gate run before a restored
//! snapshot is written to storage. It is the only layer that converts the
//! pure detection results from `fahrlog-chain` into raised errors, because
//! import is the one place where "reject the whole operation" is the
//! correct response. Nothing is ever partially applied: the first failed
//! check aborts the import.
//!
//! Checks per audit-protected vehicle, in ascending vehicle-id order:
//!
//! 1. **Completeness** — every one of its trips must carry a chain hash.
//! 2. **Chain** — the stored hashes must verify as an unbroken chain.
//! 3. **Aggregate** — when the snapshot carries a digest map, every stored
//!    digest must match a fresh recomputation over the imported data.
//!
//! Non-protected vehicles are exempt from all three; their trips may have
//! no chain hashes at all.

use tracing::{debug, info, warn};

use fahrlog_chain::{
    aggregate::{AggregateHasher, AggregateStatus},
    chain::{ChainHasher, ChainStatus},
};
use fahrlog_contracts::{
    error::{FahrlogError, FahrlogResult},
    snapshot::BackupSnapshot,
    trip::Trip,
    vehicle::Vehicle,
};

/// The restore-time integrity gate.
pub struct ImportVerifier {
    chain: ChainHasher,
    aggregate: AggregateHasher,
}

impl Default for ImportVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportVerifier {
    /// Create a verifier using SHA-256 for both calculators.
    pub fn new() -> Self {
        Self {
            chain: ChainHasher::default(),
            aggregate: AggregateHasher::default(),
        }
    }

    /// Create a verifier over caller-supplied calculators.
    pub fn with_hashers(chain: ChainHasher, aggregate: AggregateHasher) -> Self {
        Self { chain, aggregate }
    }

    /// Verify an imported snapshot; `Ok(())` means accept.
    ///
    /// Returns the first applicable [`FahrlogError`] on rejection. The
    /// caller must not write anything to storage unless this returns `Ok` —
    /// acceptance is all-or-nothing.
    pub fn verify_snapshot(&self, snapshot: &BackupSnapshot) -> FahrlogResult<()> {
        let mut protected: Vec<&Vehicle> = snapshot
            .vehicles
            .iter()
            .filter(|v| v.audit_protected)
            .collect();
        protected.sort_by_key(|v| v.id);

        for vehicle in &protected {
            let mut trips: Vec<Trip> = snapshot
                .trips
                .iter()
                .filter(|t| t.vehicle_id == Some(vehicle.id))
                .cloned()
                .collect();
            trips.sort_by_key(|t| t.id);

            // Completeness: a protected vehicle with any unhashed trip has
            // an unverifiable history.
            if let Some(trip) = trips.iter().find(|t| t.chain_hash().is_none()) {
                warn!(
                    vehicle_id = vehicle.id,
                    trip_id = trip.id,
                    "import rejected: protected vehicle has trip without chain hash"
                );
                return Err(FahrlogError::MissingChainHash {
                    vehicle: vehicle.label(),
                    trip_id: trip.id,
                });
            }

            match self.chain.verify_chain(&trips) {
                ChainStatus::Valid => {
                    debug!(
                        vehicle_id = vehicle.id,
                        trip_count = trips.len(),
                        "chain verified"
                    );
                }
                ChainStatus::Broken { trip_id, .. } => {
                    warn!(
                        vehicle_id = vehicle.id,
                        trip_id, "import rejected: broken chain"
                    );
                    return Err(FahrlogError::BrokenChain {
                        vehicle: vehicle.label(),
                        trip_id,
                    });
                }
            }
        }

        // Aggregate digests, when the snapshot carries any. Older snapshots
        // without a map pass unconditionally.
        if !snapshot.vehicle_integrity.is_empty() {
            let status = self.aggregate.verify_hashes(
                &snapshot.vehicle_integrity,
                &snapshot.vehicles,
                &snapshot.trips,
                &snapshot.audit_log,
            );

            if let AggregateStatus::TamperingDetected { vehicle_ids } = status {
                let vehicles: Vec<String> = vehicle_ids
                    .iter()
                    .map(|id| {
                        snapshot
                            .vehicles
                            .iter()
                            .find(|v| v.id == *id)
                            .map(Vehicle::label)
                            .unwrap_or_else(|| format!("vehicle #{}", id))
                    })
                    .collect();
                warn!(?vehicle_ids, "import rejected: aggregate digest mismatch");
                return Err(FahrlogError::AggregateTamperDetected { vehicles });
            }
        }

        info!(
            vehicles = snapshot.vehicles.len(),
            trips = snapshot.trips.len(),
            protected = protected.len(),
            "snapshot accepted"
        );
        Ok(())
    }

    /// Seal a snapshot for export: compute and embed the per-vehicle
    /// aggregate digest map, replacing any previous map.
    pub fn seal_snapshot(&self, snapshot: &mut BackupSnapshot) {
        snapshot.vehicle_integrity = self.aggregate.compute_hashes(
            &snapshot.vehicles,
            &snapshot.trips,
            &snapshot.audit_log,
        );
        debug!(
            digests = snapshot.vehicle_integrity.len(),
            "snapshot sealed"
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use fahrlog_chain::ChainHasher;
    use fahrlog_contracts::{
        audit::AuditLogEntry, error::FahrlogError, snapshot::BackupSnapshot, trip::Trip,
        vehicle::Vehicle,
    };

    use super::ImportVerifier;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn make_vehicle(id: i64, audit_protected: bool) -> Vehicle {
        Vehicle {
            id,
            make: "Skoda".to_string(),
            model: "Octavia".to_string(),
            license_plate: format!("HH-OK {}", id),
            fuel_type: "Diesel".to_string(),
            audit_protected,
        }
    }

    fn make_trip(id: i64, vehicle_id: i64, distance_km: f64) -> Trip {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::days(id);
        Trip::builder(id, start, "Hamburg", "Lübeck", distance_km, "site inspection")
            .vehicle(vehicle_id)
            .end_time(start + Duration::hours(2))
            .odometer(20_000 + id * 100, 20_000 + id * 100 + distance_km as i64)
            .build()
    }

    /// Trips for one vehicle with a freshly built, valid chain.
    fn chained_trips(count: i64, vehicle_id: i64) -> Vec<Trip> {
        let hasher = ChainHasher::default();
        let trips: Vec<Trip> = (1..=count)
            .map(|id| make_trip(vehicle_id * 100 + id, vehicle_id, 50.0 * id as f64))
            .collect();
        let hashes = hasher.compute_chain_hashes(&trips);
        trips
            .into_iter()
            .zip(hashes)
            .map(|(trip, (_, hash))| trip.with_chain_hash(hash))
            .collect()
    }

    fn snapshot(vehicles: Vec<Vehicle>, trips: Vec<Trip>) -> BackupSnapshot {
        BackupSnapshot {
            vehicles,
            trips,
            audit_log: Vec::new(),
            vehicle_integrity: Default::default(),
        }
    }

    // ── Accept paths ──────────────────────────────────────────────────────────

    /// A valid chained snapshot for a protected vehicle is accepted.
    #[test]
    fn test_accepts_valid_snapshot() {
        let snap = snapshot(vec![make_vehicle(1, true)], chained_trips(5, 1));
        assert!(ImportVerifier::new().verify_snapshot(&snap).is_ok());
    }

    /// A non-protected vehicle with entirely unhashed trips is exempt from
    /// every check.
    #[test]
    fn test_accepts_unprotected_without_hashes() {
        let trips = vec![make_trip(1, 1, 10.0), make_trip(2, 1, 20.0)];
        let snap = snapshot(vec![make_vehicle(1, false)], trips);
        assert!(ImportVerifier::new().verify_snapshot(&snap).is_ok());
    }

    /// An empty snapshot is trivially acceptable.
    #[test]
    fn test_accepts_empty_snapshot() {
        let snap = snapshot(Vec::new(), Vec::new());
        assert!(ImportVerifier::new().verify_snapshot(&snap).is_ok());
    }

    /// A protected vehicle with no trips has nothing to check.
    #[test]
    fn test_accepts_protected_vehicle_without_trips() {
        let snap = snapshot(vec![make_vehicle(1, true)], Vec::new());
        assert!(ImportVerifier::new().verify_snapshot(&snap).is_ok());
    }

    /// Seal-then-verify round-trips: the export side and the import side
    /// agree on the digest map.
    #[test]
    fn test_seal_then_verify_round_trip() {
        let verifier = ImportVerifier::new();
        let mut snap = snapshot(vec![make_vehicle(1, true)], chained_trips(3, 1));
        snap.audit_log.push(AuditLogEntry {
            id: 1,
            trip_id: 101,
            field_name: "purpose".to_string(),
            old_value: None,
            new_value: Some("site inspection".to_string()),
            changed_at: Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap(),
        });

        verifier.seal_snapshot(&mut snap);
        assert_eq!(snap.vehicle_integrity.len(), 1);
        assert!(verifier.verify_snapshot(&snap).is_ok());

        // And it survives the JSON envelope.
        let json = serde_json::to_string(&snap).unwrap();
        let restored: BackupSnapshot = serde_json::from_str(&json).unwrap();
        assert!(verifier.verify_snapshot(&restored).is_ok());
    }

    // ── Reject paths ──────────────────────────────────────────────────────────

    /// Trip #2 of 3 lacking a chain hash rejects with MissingChainHash
    /// naming the vehicle.
    #[test]
    fn test_rejects_missing_chain_hash() {
        let vehicle = make_vehicle(1, true);
        let mut trips = chained_trips(3, 1);
        trips[1] = trips[1].clone().without_chain_hash();
        let snap = snapshot(vec![vehicle.clone()], trips);

        match ImportVerifier::new().verify_snapshot(&snap) {
            Err(FahrlogError::MissingChainHash { vehicle: label, trip_id }) => {
                assert_eq!(label, vehicle.label());
                assert_eq!(trip_id, 102);
            }
            other => panic!("expected MissingChainHash, got {:?}", other),
        }
    }

    /// Altering a mid-chain trip after hashing rejects with BrokenChain
    /// naming the offending trip.
    #[test]
    fn test_rejects_broken_chain() {
        let vehicle = make_vehicle(1, true);
        let mut trips = chained_trips(5, 1);
        trips[2].distance_km += 1.0;
        let snap = snapshot(vec![vehicle.clone()], trips);

        match ImportVerifier::new().verify_snapshot(&snap) {
            Err(FahrlogError::BrokenChain { vehicle: label, trip_id }) => {
                assert_eq!(label, vehicle.label());
                assert_eq!(trip_id, 103);
            }
            other => panic!("expected BrokenChain, got {:?}", other),
        }
    }

    /// An aggregate digest mismatch rejects with the complete list of
    /// affected vehicles.
    #[test]
    fn test_rejects_aggregate_tampering() {
        let verifier = ImportVerifier::new();
        let v1 = make_vehicle(1, true);
        let v2 = make_vehicle(2, true);

        let mut trips = chained_trips(2, 1);
        trips.extend(chained_trips(2, 2));
        let mut snap = snapshot(vec![v1.clone(), v2.clone()], trips);
        verifier.seal_snapshot(&mut snap);

        // Tamper both vehicles' audit history: the chains stay intact, only
        // the aggregate digests notice.
        snap.audit_log.push(AuditLogEntry {
            id: 1,
            trip_id: 101,
            field_name: "notes".to_string(),
            old_value: None,
            new_value: Some("injected".to_string()),
            changed_at: Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap(),
        });
        snap.audit_log.push(AuditLogEntry {
            id: 2,
            trip_id: 201,
            field_name: "notes".to_string(),
            old_value: None,
            new_value: Some("injected".to_string()),
            changed_at: Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap(),
        });

        match verifier.verify_snapshot(&snap) {
            Err(FahrlogError::AggregateTamperDetected { vehicles }) => {
                assert_eq!(vehicles, vec![v1.label(), v2.label()]);
            }
            other => panic!("expected AggregateTamperDetected, got {:?}", other),
        }
    }

    /// A snapshot without a digest map skips the aggregate check entirely.
    #[test]
    fn test_missing_digest_map_is_not_rejection() {
        // Valid chain, no vehicle_integrity map at all.
        let snap = snapshot(vec![make_vehicle(1, true)], chained_trips(2, 1));
        assert!(snap.vehicle_integrity.is_empty());
        assert!(ImportVerifier::new().verify_snapshot(&snap).is_ok());
    }

    /// A digest entry for a vehicle absent from the snapshot is ignored.
    #[test]
    fn test_stale_digest_entry_ignored() {
        let verifier = ImportVerifier::new();
        let mut snap = snapshot(vec![make_vehicle(1, true)], chained_trips(2, 1));
        verifier.seal_snapshot(&mut snap);
        snap.vehicle_integrity.insert(42, "ab".repeat(32));

        assert!(verifier.verify_snapshot(&snap).is_ok());
    }

    /// The completeness check fires before the chain check: an unhashed
    /// trip reports MissingChainHash even when the rest is broken too.
    #[test]
    fn test_missing_hash_takes_precedence() {
        let mut trips = chained_trips(3, 1);
        trips[0].distance_km += 1.0; // would be BrokenChain
        trips[2] = trips[2].clone().without_chain_hash(); // MissingChainHash
        let snap = snapshot(vec![make_vehicle(1, true)], trips);

        match ImportVerifier::new().verify_snapshot(&snap) {
            Err(FahrlogError::MissingChainHash { trip_id, .. }) => assert_eq!(trip_id, 103),
            other => panic!("expected MissingChainHash, got {:?}", other),
        }
    }
}
