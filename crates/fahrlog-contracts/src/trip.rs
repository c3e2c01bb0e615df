//! The trip record — one journey in a vehicle's ledger.
//!
//! `Trip` is created and mutated by the surrounding application; the
//! integrity engine only reads it and writes back `chain_hash` through the
//! storage collaborator.  The `chain_hash` field is deliberately private:
//! there is no public setter, so the only paths that can carry a hash are
//! deserialization (restoring persisted state) and the explicit
//! `with_chain_hash` constructor used by storage implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded journey.
///
/// Every field except `chain_hash` is supplied by the application layer.
/// For a trip belonging to an audit-protected vehicle, `chain_hash` binds
/// the trip to its predecessor in that vehicle's history; once assigned it
/// must match the recomputed value or the chain reports as broken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    /// Storage-assigned identifier, monotonically increasing per creation order.
    pub id: i64,

    /// Start instant of the trip.
    pub date: DateTime<Utc>,

    /// End instant, if the trip has been completed.
    pub end_time: Option<DateTime<Utc>>,

    /// Display name of the start location.
    pub start_location: String,

    /// Display name of the end location.
    pub end_location: String,

    /// Driven distance in kilometers; may be fractional.
    pub distance_km: f64,

    /// Purpose label (e.g. "customer visit").
    pub purpose: String,

    /// Reference to a purpose category, if one is assigned.
    pub purpose_category_id: Option<i64>,

    /// Free-form notes.
    pub notes: Option<String>,

    /// Odometer reading at departure.
    pub start_odometer: Option<i64>,

    /// Odometer reading at arrival.
    pub end_odometer: Option<i64>,

    /// The owning vehicle. Trips without a vehicle are never chained.
    pub vehicle_id: Option<i64>,

    /// Whether the trip was cancelled after recording.
    pub cancelled: bool,

    /// Reason text for a cancellation.
    pub cancellation_reason: Option<String>,

    /// Whether the trip is active (not archived by the application).
    pub active: bool,

    /// GPS-measured distance in kilometers, when auto-tracking ran.
    pub gps_distance_km: Option<f64>,

    /// Business partner visited, for business trips.
    pub business_partner: Option<String>,

    /// Route or detour description.
    pub route_details: Option<String>,

    /// Hash binding this trip to its predecessor in the vehicle's chain.
    ///
    /// Written exclusively by the chain maintenance service via the storage
    /// collaborator. Never contributes to its own hash input.
    #[serde(default)]
    chain_hash: Option<String>,
}

impl Trip {
    /// Start building a trip from its required fields.
    ///
    /// Optional fields default to absent, `active` to true and `cancelled`
    /// to false. The builder has no way to assign a chain hash — that field
    /// belongs to the chain maintenance service.
    pub fn builder(
        id: i64,
        date: DateTime<Utc>,
        start_location: impl Into<String>,
        end_location: impl Into<String>,
        distance_km: f64,
        purpose: impl Into<String>,
    ) -> TripBuilder {
        TripBuilder {
            trip: Trip {
                id,
                date,
                end_time: None,
                start_location: start_location.into(),
                end_location: end_location.into(),
                distance_km,
                purpose: purpose.into(),
                purpose_category_id: None,
                notes: None,
                start_odometer: None,
                end_odometer: None,
                vehicle_id: None,
                cancelled: false,
                cancellation_reason: None,
                active: true,
                gps_distance_km: None,
                business_partner: None,
                route_details: None,
                chain_hash: None,
            },
        }
    }

    /// The stored chain hash, if one has been assigned.
    pub fn chain_hash(&self) -> Option<&str> {
        self.chain_hash.as_deref()
    }

    /// Attach a persisted chain hash while materializing a trip.
    ///
    /// For storage implementations restoring state. Application code must
    /// never assign hashes directly — the chain maintenance service owns
    /// this field.
    pub fn with_chain_hash(mut self, hash: impl Into<String>) -> Self {
        self.chain_hash = Some(hash.into());
        self
    }

    /// Drop the stored chain hash, returning the trip to its unchained state.
    pub fn without_chain_hash(mut self) -> Self {
        self.chain_hash = None;
        self
    }
}

/// Builder for `Trip`, used by the application and by tests.
///
/// Deliberately offers no chain-hash method; see `Trip::with_chain_hash`
/// for the storage-restore path.
#[derive(Debug)]
pub struct TripBuilder {
    trip: Trip,
}

impl TripBuilder {
    /// Set the end instant.
    pub fn end_time(mut self, end: DateTime<Utc>) -> Self {
        self.trip.end_time = Some(end);
        self
    }

    /// Assign the purpose category reference.
    pub fn purpose_category(mut self, id: i64) -> Self {
        self.trip.purpose_category_id = Some(id);
        self
    }

    /// Attach free-form notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.trip.notes = Some(notes.into());
        self
    }

    /// Set both odometer readings.
    pub fn odometer(mut self, start: i64, end: i64) -> Self {
        self.trip.start_odometer = Some(start);
        self.trip.end_odometer = Some(end);
        self
    }

    /// Assign the owning vehicle.
    pub fn vehicle(mut self, vehicle_id: i64) -> Self {
        self.trip.vehicle_id = Some(vehicle_id);
        self
    }

    /// Mark the trip as cancelled with a reason.
    pub fn cancelled(mut self, reason: impl Into<String>) -> Self {
        self.trip.cancelled = true;
        self.trip.cancellation_reason = Some(reason.into());
        self
    }

    /// Set the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.trip.active = active;
        self
    }

    /// Record the GPS-measured distance.
    pub fn gps_distance(mut self, km: f64) -> Self {
        self.trip.gps_distance_km = Some(km);
        self
    }

    /// Record the visited business partner.
    pub fn business_partner(mut self, partner: impl Into<String>) -> Self {
        self.trip.business_partner = Some(partner.into());
        self
    }

    /// Record a route or detour description.
    pub fn route_details(mut self, route: impl Into<String>) -> Self {
        self.trip.route_details = Some(route.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Trip {
        self.trip
    }
}
