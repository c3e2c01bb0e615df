//! # fahrlog-contracts
//!
//! Shared types for the fahrlog integrity engine: the trip/vehicle/audit
//! data model, the backup snapshot envelope, and the error taxonomy.
//!
//! No business logic lives in this crate — only data definitions and
//! error types. All other fahrlog crates import from here.

pub mod audit;
pub mod error;
pub mod snapshot;
pub mod trip;
pub mod vehicle;

pub use audit::AuditLogEntry;
pub use error::{FahrlogError, FahrlogResult};
pub use snapshot::BackupSnapshot;
pub use trip::{Trip, TripBuilder};
pub use vehicle::Vehicle;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn sample_vehicle() -> Vehicle {
        Vehicle {
            id: 7,
            make: "Volkswagen".to_string(),
            model: "Passat".to_string(),
            license_plate: "B-XY 1234".to_string(),
            fuel_type: "Diesel".to_string(),
            audit_protected: true,
        }
    }

    fn sample_trip() -> Trip {
        Trip::builder(
            1,
            Utc.with_ymd_and_hms(2024, 3, 14, 8, 30, 0).unwrap(),
            "Berlin",
            "Potsdam",
            42.5,
            "customer visit",
        )
        .vehicle(7)
        .odometer(10_000, 10_042)
        .build()
    }

    // ── Trip ─────────────────────────────────────────────────────────────────

    #[test]
    fn builder_defaults() {
        let trip = sample_trip();
        assert!(trip.active);
        assert!(!trip.cancelled);
        assert!(trip.cancellation_reason.is_none());
        assert!(trip.chain_hash().is_none());
        assert_eq!(trip.vehicle_id, Some(7));
    }

    #[test]
    fn chain_hash_attach_and_detach() {
        let trip = sample_trip().with_chain_hash("ab".repeat(32));
        assert_eq!(trip.chain_hash(), Some("ab".repeat(32).as_str()));

        let trip = trip.without_chain_hash();
        assert!(trip.chain_hash().is_none());
    }

    #[test]
    fn trip_serde_round_trip_preserves_chain_hash() {
        let trip = sample_trip().with_chain_hash("cd".repeat(32));
        let json = serde_json::to_string(&trip).unwrap();
        let decoded: Trip = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.chain_hash(), trip.chain_hash());
        assert_eq!(decoded.id, trip.id);
        assert_eq!(decoded.distance_km, trip.distance_km);
    }

    #[test]
    fn trip_deserializes_without_chain_hash_field() {
        // Snapshots from non-protected vehicles carry no chain_hash at all.
        let json = serde_json::json!({
            "id": 3,
            "date": "2024-03-14T08:30:00Z",
            "end_time": null,
            "start_location": "A",
            "end_location": "B",
            "distance_km": 1.0,
            "purpose": "errand",
            "purpose_category_id": null,
            "notes": null,
            "start_odometer": null,
            "end_odometer": null,
            "vehicle_id": null,
            "cancelled": false,
            "cancellation_reason": null,
            "active": true,
            "gps_distance_km": null,
            "business_partner": null,
            "route_details": null
        });
        let trip: Trip = serde_json::from_value(json).unwrap();
        assert!(trip.chain_hash().is_none());
    }

    // ── Vehicle ──────────────────────────────────────────────────────────────

    #[test]
    fn vehicle_label_names_make_model_plate() {
        assert_eq!(sample_vehicle().label(), "Volkswagen Passat (B-XY 1234)");
    }

    // ── Snapshot ─────────────────────────────────────────────────────────────

    #[test]
    fn snapshot_round_trips_with_integrity_map() {
        let mut integrity = BTreeMap::new();
        integrity.insert(7_i64, "ef".repeat(32));

        let snapshot = BackupSnapshot {
            vehicles: vec![sample_vehicle()],
            trips: vec![sample_trip()],
            audit_log: vec![AuditLogEntry {
                id: 1,
                trip_id: 1,
                field_name: "distance_km".to_string(),
                old_value: Some("42.5".to_string()),
                new_value: Some("43.5".to_string()),
                changed_at: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            }],
            vehicle_integrity: integrity,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: BackupSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.vehicle_integrity.get(&7), Some(&"ef".repeat(32)));
        assert_eq!(decoded.vehicles, snapshot.vehicles);
        assert_eq!(decoded.audit_log, snapshot.audit_log);
    }

    #[test]
    fn snapshot_integrity_map_is_optional() {
        // Pre-integrity snapshots have no vehicle_integrity key at all.
        let json = serde_json::json!({
            "vehicles": [],
            "trips": [],
            "audit_log": []
        });
        let snapshot: BackupSnapshot = serde_json::from_value(json).unwrap();
        assert!(snapshot.vehicle_integrity.is_empty());

        // And an empty map is omitted on the way out.
        let out = serde_json::to_value(&snapshot).unwrap();
        assert!(out.get("vehicle_integrity").is_none());
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_missing_chain_hash_display() {
        let err = FahrlogError::MissingChainHash {
            vehicle: "Volkswagen Passat (B-XY 1234)".to_string(),
            trip_id: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Volkswagen Passat (B-XY 1234)"));
        assert!(msg.contains("trip #2"));
        assert!(msg.contains("no chain hash"));
    }

    #[test]
    fn error_broken_chain_display() {
        let err = FahrlogError::BrokenChain {
            vehicle: "Audi A4 (M-AB 99)".to_string(),
            trip_id: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Audi A4 (M-AB 99)"));
        assert!(msg.contains("trip #3"));
    }

    #[test]
    fn error_aggregate_tamper_display_lists_all_vehicles() {
        let err = FahrlogError::AggregateTamperDetected {
            vehicles: vec!["Audi A4 (M-AB 99)".to_string(), "vehicle #12".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Audi A4 (M-AB 99), vehicle #12"));
    }

    #[test]
    fn error_storage_failed_display() {
        let err = FahrlogError::StorageFailed {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("disk full"));
    }
}
