//! The storage collaborator boundary.
//!
//! The integrity engine never owns persistence. Everything it needs from
//! the data layer is expressed by `TripStore`: ordered reads of a
//! vehicle's trips, point lookups, and the single write-back it is allowed
//! to perform — persisting a recomputed chain hash.
//!
//! Implementations are expected to be database- or file-backed in the real
//! application; `fahrlog-chain` ships an in-memory implementation for
//! tests and demos.

use fahrlog_contracts::{error::FahrlogResult, trip::Trip, vehicle::Vehicle};

/// Read/write access to the trip ledger, as consumed by the engine.
///
/// The engine issues writes in ascending trip-id order during a full chain
/// recompute; implementations must apply them in call order so an
/// interrupted recompute leaves a valid prefix chain behind.
pub trait TripStore {
    /// Load a single trip by id. `None` when it does not exist.
    fn load_trip(&self, id: i64) -> FahrlogResult<Option<Trip>>;

    /// Load a single vehicle by id. `None` when it does not exist.
    fn load_vehicle(&self, id: i64) -> FahrlogResult<Option<Vehicle>>;

    /// Load all trips belonging to `vehicle_id`, ascending by trip id.
    fn trips_for_vehicle(&self, vehicle_id: i64) -> FahrlogResult<Vec<Trip>>;

    /// Persist a freshly computed chain hash onto the given trip.
    ///
    /// This is the only mutation the engine performs. The write must be
    /// durable before the call returns, or at least ordered after every
    /// previously issued `persist_chain_hash` for the same vehicle.
    fn persist_chain_hash(&self, trip_id: i64, hash: &str) -> FahrlogResult<()>;
}
