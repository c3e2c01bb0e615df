//! In-memory implementation of `TripStore`.
//!
//! `InMemoryTripStore` is the reference store used by tests and the demo
//! binary. It keeps trips and vehicles in `BTreeMap`s behind a `Mutex`, so
//! iteration order is ascending by id for free and the store can be shared
//! across threads.

use std::collections::BTreeMap;
use std::sync::Mutex;

use fahrlog_contracts::{
    error::{FahrlogError, FahrlogResult},
    trip::Trip,
    vehicle::Vehicle,
};
use fahrlog_core::traits::TripStore;

struct State {
    trips: BTreeMap<i64, Trip>,
    vehicles: BTreeMap<i64, Vehicle>,
}

/// An in-memory trip store keyed by id.
pub struct InMemoryTripStore {
    state: Mutex<State>,
}

impl Default for InMemoryTripStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTripStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                trips: BTreeMap::new(),
                vehicles: BTreeMap::new(),
            }),
        }
    }

    /// Insert or replace a vehicle.
    pub fn insert_vehicle(&self, vehicle: Vehicle) {
        let mut state = self.state.lock().expect("trip store lock poisoned");
        state.vehicles.insert(vehicle.id, vehicle);
    }

    /// Insert or replace a trip.
    pub fn insert_trip(&self, trip: Trip) {
        let mut state = self.state.lock().expect("trip store lock poisoned");
        state.trips.insert(trip.id, trip);
    }

    /// Snapshot of all trips, ascending by id. For assertions and export.
    pub fn all_trips(&self) -> Vec<Trip> {
        let state = self.state.lock().expect("trip store lock poisoned");
        state.trips.values().cloned().collect()
    }

    /// Snapshot of all vehicles, ascending by id.
    pub fn all_vehicles(&self) -> Vec<Vehicle> {
        let state = self.state.lock().expect("trip store lock poisoned");
        state.vehicles.values().cloned().collect()
    }

    fn lock(&self) -> FahrlogResult<std::sync::MutexGuard<'_, State>> {
        self.state.lock().map_err(|e| FahrlogError::StorageFailed {
            reason: format!("trip store lock poisoned: {}", e),
        })
    }
}

impl TripStore for InMemoryTripStore {
    fn load_trip(&self, id: i64) -> FahrlogResult<Option<Trip>> {
        Ok(self.lock()?.trips.get(&id).cloned())
    }

    fn load_vehicle(&self, id: i64) -> FahrlogResult<Option<Vehicle>> {
        Ok(self.lock()?.vehicles.get(&id).cloned())
    }

    fn trips_for_vehicle(&self, vehicle_id: i64) -> FahrlogResult<Vec<Trip>> {
        // BTreeMap values iterate ascending by key, which is the required
        // ascending-trip-id order.
        Ok(self
            .lock()?
            .trips
            .values()
            .filter(|t| t.vehicle_id == Some(vehicle_id))
            .cloned()
            .collect())
    }

    fn persist_chain_hash(&self, trip_id: i64, hash: &str) -> FahrlogResult<()> {
        let mut state = self.lock()?;
        match state.trips.remove(&trip_id) {
            Some(trip) => {
                state.trips.insert(trip_id, trip.with_chain_hash(hash));
                Ok(())
            }
            None => Err(FahrlogError::StorageFailed {
                reason: format!("cannot persist chain hash: trip #{} not found", trip_id),
            }),
        }
    }
}
