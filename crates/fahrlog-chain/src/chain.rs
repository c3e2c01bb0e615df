//! Per-vehicle chain hashing: computation and verification of the linked
//! hash chain over a vehicle's ordered trips.
//!
//! Hash input layout (bytes, in order):
//!   1. previous chain hash as UTF-8 bytes (empty for the genesis trip)
//!   2. chain-form canonical encoding of the trip (see [`crate::canon`])
//!
//! The chain is a pure forward fold: no shared mutable "current tip" state
//! exists anywhere. Verification short-circuits at the first mismatch — a
//! broken link makes every later link transitively suspect, so reporting
//! more than the first break adds nothing.

use fahrlog_contracts::trip::Trip;
use fahrlog_core::digest::{Digest256, Sha256Digest};

use crate::canon::encode_for_chain;

/// The seed "previous hash" for the first trip in a chain.
///
/// An empty string, not a zero digest: the genesis contribution to the
/// hash input is zero bytes. A `None` previous hash is treated identically.
pub const GENESIS_HASH: &str = "";

/// Outcome of verifying one vehicle's chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    /// Every stored hash matches the recomputed chain.
    Valid,

    /// The first trip whose stored hash does not match.
    Broken {
        /// Identifier of the offending trip.
        trip_id: i64,
        /// The hash that should have been stored.
        expected: String,
        /// The hash that was actually stored, absent when the trip has none.
        actual: Option<String>,
    },
}

impl ChainStatus {
    /// True when the chain verified cleanly.
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainStatus::Valid)
    }
}

/// Computes and verifies per-vehicle trip hash chains.
///
/// Holds the injected digest capability; `Default` wires in SHA-256, which
/// is what production always uses.
pub struct ChainHasher {
    digest: Box<dyn Digest256>,
}

impl Default for ChainHasher {
    fn default() -> Self {
        Self::new(Box::new(Sha256Digest))
    }
}

impl ChainHasher {
    /// Create a hasher over a caller-supplied digest implementation.
    pub fn new(digest: Box<dyn Digest256>) -> Self {
        Self { digest }
    }

    /// Compute the chain hash for a single trip.
    ///
    /// `prev` is the predecessor's chain hash, or `None`/`""` for the first
    /// trip in the vehicle's ordered sequence. Returns the lowercase hex
    /// digest (64 characters for SHA-256). The trip's own stored chain hash
    /// never contributes to the result.
    pub fn compute_chain_hash(&self, trip: &Trip, prev: Option<&str>) -> String {
        let prev = prev.unwrap_or(GENESIS_HASH);
        let encoded = encode_for_chain(trip);

        let mut input = Vec::with_capacity(prev.len() + encoded.len());
        input.extend_from_slice(prev.as_bytes());
        input.extend_from_slice(&encoded);

        self.digest.digest_hex(&input)
    }

    /// Compute the full chain over trips already ordered ascending by id.
    ///
    /// Pure fold from [`GENESIS_HASH`]; returns one `(trip_id, hash)` pair
    /// per input trip, in order.
    pub fn compute_chain_hashes(&self, trips: &[Trip]) -> Vec<(i64, String)> {
        let mut prev = GENESIS_HASH.to_string();
        trips
            .iter()
            .map(|trip| {
                let hash = self.compute_chain_hash(trip, Some(&prev));
                prev = hash.clone();
                (trip.id, hash)
            })
            .collect()
    }

    /// Verify stored chain hashes against a freshly recomputed chain.
    ///
    /// Walks forward, recomputing each expected hash, and returns at the
    /// first trip whose stored hash is absent or different. An empty slice
    /// is trivially valid.
    pub fn verify_chain(&self, trips: &[Trip]) -> ChainStatus {
        let mut prev = GENESIS_HASH.to_string();

        for trip in trips {
            let expected = self.compute_chain_hash(trip, Some(&prev));

            match trip.chain_hash() {
                Some(actual) if actual == expected => {}
                actual => {
                    return ChainStatus::Broken {
                        trip_id: trip.id,
                        expected,
                        actual: actual.map(str::to_string),
                    };
                }
            }

            prev = expected;
        }

        ChainStatus::Valid
    }
}
