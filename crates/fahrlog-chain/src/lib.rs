//! # fahrlog-chain
//!
//! The hashing heart of the fahrlog integrity engine:
//!
//! - [`canon`]       — deterministic canonical encodings used as hash input
//! - [`chain`]       — the per-vehicle linked hash chain over trips
//! - [`aggregate`]   — one whole-history digest per audit-protected vehicle
//! - [`maintenance`] — chain recomputation after trip mutations
//! - [`memory`]      — in-memory `TripStore` for tests and demos
//!
//! Any edit, deletion, reordering, or insertion in a protected vehicle's
//! trip history breaks a verifiable link. Detection is the contract here,
//! not correction: a broken chain is evidence, and nothing in this crate
//! tries to heal it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fahrlog_chain::{ChainHasher, ChainMaintenance};
//!
//! let maintenance = ChainMaintenance::new(&store);
//! maintenance.update_chain_hash(trip_id)?;
//!
//! let hasher = ChainHasher::default();
//! assert!(hasher.verify_chain(&trips).is_valid());
//! ```

pub mod aggregate;
pub mod canon;
pub mod chain;
pub mod maintenance;
pub mod memory;

pub use aggregate::{AggregateHasher, AggregateStatus};
pub use chain::{ChainHasher, ChainStatus, GENESIS_HASH};
pub use maintenance::ChainMaintenance;
pub use memory::InMemoryTripStore;
