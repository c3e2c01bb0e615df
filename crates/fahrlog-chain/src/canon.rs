//! Canonical encodings: deterministic byte representations used as hash
//! input.
//!
//! Every encoding is UTF-8 text, pipe-delimited, terminated by a single
//! newline. Absent optional values render the literal `null`, timestamps
//! render as epoch milliseconds, booleans as `true`/`false`, and floats
//! through Rust's `Display`. Field order is part of the format — reordering
//! changes every derived hash and is a breaking change.
//!
//! Two independent trip encodings exist on purpose. The chain form and the
//! aggregate form differ in field membership (the chain form carries the
//! active flag and the GPS distance, the aggregate form carries neither)
//! and both already have hashes committed to real backups, so they are kept
//! byte-exact as two separate functions rather than one parameterized one.
//!
//! The stored chain hash never contributes to any encoding — hashing a
//! trip's own chain hash would be circular.

use chrono::{DateTime, Utc};

use fahrlog_contracts::{audit::AuditLogEntry, trip::Trip, vehicle::Vehicle};

/// Sentinel rendered for absent optional values.
const NULL: &str = "null";

fn opt<T: ToString>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NULL.to_string(),
    }
}

fn opt_millis(value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(t) => t.timestamp_millis().to_string(),
        None => NULL.to_string(),
    }
}

fn join(fields: &[String]) -> Vec<u8> {
    let mut line = fields.join("|");
    line.push('\n');
    line.into_bytes()
}

/// Chain-form canonical encoding of a trip.
///
/// Field order: id, start millis, start location, end location, distance,
/// purpose, purpose category, notes, start odometer, end odometer, vehicle,
/// cancelled, cancellation reason, active, end millis, gps distance,
/// business partner, route.
pub fn encode_for_chain(trip: &Trip) -> Vec<u8> {
    join(&[
        trip.id.to_string(),
        trip.date.timestamp_millis().to_string(),
        trip.start_location.clone(),
        trip.end_location.clone(),
        trip.distance_km.to_string(),
        trip.purpose.clone(),
        opt(&trip.purpose_category_id),
        opt(&trip.notes),
        opt(&trip.start_odometer),
        opt(&trip.end_odometer),
        opt(&trip.vehicle_id),
        trip.cancelled.to_string(),
        opt(&trip.cancellation_reason),
        trip.active.to_string(),
        opt_millis(&trip.end_time),
        opt(&trip.gps_distance_km),
        opt(&trip.business_partner),
        opt(&trip.route_details),
    ])
}

/// Aggregate-form canonical encoding of a trip.
///
/// Same as the chain form except the active flag and the GPS distance are
/// omitted. Do not unify with [`encode_for_chain`] — see the module docs.
pub fn encode_for_aggregate(trip: &Trip) -> Vec<u8> {
    join(&[
        trip.id.to_string(),
        trip.date.timestamp_millis().to_string(),
        trip.start_location.clone(),
        trip.end_location.clone(),
        trip.distance_km.to_string(),
        trip.purpose.clone(),
        opt(&trip.purpose_category_id),
        opt(&trip.notes),
        opt(&trip.start_odometer),
        opt(&trip.end_odometer),
        opt(&trip.vehicle_id),
        trip.cancelled.to_string(),
        opt(&trip.cancellation_reason),
        opt_millis(&trip.end_time),
        opt(&trip.business_partner),
        opt(&trip.route_details),
    ])
}

/// Canonical vehicle-identity encoding used at the head of each aggregate
/// digest.
pub fn encode_vehicle(vehicle: &Vehicle) -> Vec<u8> {
    join(&[
        vehicle.id.to_string(),
        vehicle.make.clone(),
        vehicle.model.clone(),
        vehicle.license_plate.clone(),
        vehicle.fuel_type.clone(),
        vehicle.audit_protected.to_string(),
    ])
}

/// Canonical encoding of one audit log entry.
pub fn encode_audit_entry(entry: &AuditLogEntry) -> Vec<u8> {
    join(&[
        entry.id.to_string(),
        entry.trip_id.to_string(),
        entry.field_name.clone(),
        opt(&entry.old_value),
        opt(&entry.new_value),
        entry.changed_at.timestamp_millis().to_string(),
    ])
}
