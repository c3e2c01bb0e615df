//! Chain maintenance: keeping a vehicle's chain consistent after trip
//! mutations.
//!
//! Call [`ChainMaintenance::update_chain_hash`] after every insert or
//! update of a trip. For trips that do not belong to an audit-protected
//! vehicle the call is a silent no-op — "nothing to protect yet" is a
//! legitimate state, never an error.

use tracing::{debug, info};

use fahrlog_contracts::error::FahrlogResult;
use fahrlog_core::traits::TripStore;

use crate::chain::ChainHasher;

/// Orchestrates chain recomputation against the storage collaborator.
///
/// The caller must serialize recomputes per vehicle (at most one in
/// flight); recomputes for different vehicles are fully independent.
pub struct ChainMaintenance<'a> {
    store: &'a dyn TripStore,
    hasher: ChainHasher,
}

impl<'a> ChainMaintenance<'a> {
    /// Create a maintenance service over `store` using SHA-256 chaining.
    pub fn new(store: &'a dyn TripStore) -> Self {
        Self {
            store,
            hasher: ChainHasher::default(),
        }
    }

    /// Create a maintenance service with an injected hasher.
    pub fn with_hasher(store: &'a dyn TripStore, hasher: ChainHasher) -> Self {
        Self { store, hasher }
    }

    /// React to an insert/update of the given trip.
    ///
    /// No-op when the trip cannot be found, has no vehicle reference, the
    /// vehicle cannot be found, or the vehicle is not audit-protected.
    /// Otherwise recomputes the owning vehicle's full chain.
    pub fn update_chain_hash(&self, trip_id: i64) -> FahrlogResult<()> {
        let Some(trip) = self.store.load_trip(trip_id)? else {
            debug!(trip_id, "chain update skipped: trip not found");
            return Ok(());
        };

        let Some(vehicle_id) = trip.vehicle_id else {
            debug!(trip_id, "chain update skipped: trip has no vehicle");
            return Ok(());
        };

        let Some(vehicle) = self.store.load_vehicle(vehicle_id)? else {
            debug!(trip_id, vehicle_id, "chain update skipped: vehicle not found");
            return Ok(());
        };

        if !vehicle.audit_protected {
            debug!(trip_id, vehicle_id, "chain update skipped: vehicle not audit-protected");
            return Ok(());
        }

        self.recompute_full_chain(vehicle_id).map(|_| ())
    }

    /// Recompute and persist the full chain for one vehicle.
    ///
    /// Loads the vehicle's trips in ascending-id order, recomputes every
    /// hash, and persists only the hashes that changed — in ascending trip
    /// order, so an interrupted recompute always leaves a valid prefix
    /// chain behind. Returns the number of trips rewritten.
    pub fn recompute_full_chain(&self, vehicle_id: i64) -> FahrlogResult<usize> {
        let trips = self.store.trips_for_vehicle(vehicle_id)?;
        if trips.is_empty() {
            debug!(vehicle_id, "chain recompute skipped: no trips");
            return Ok(0);
        }

        let hashes = self.hasher.compute_chain_hashes(&trips);

        let mut rewritten = 0;
        for (trip, (trip_id, hash)) in trips.iter().zip(&hashes) {
            if trip.chain_hash() != Some(hash.as_str()) {
                self.store.persist_chain_hash(*trip_id, hash)?;
                rewritten += 1;
            }
        }

        info!(
            vehicle_id,
            trip_count = trips.len(),
            rewritten,
            "chain recompute complete"
        );

        Ok(rewritten)
    }
}
