//! # fahrlog-core
//!
//! The trait seams of the fahrlog integrity engine:
//!
//! - `TripStore`  — the storage collaborator the engine reads trips and
//!   vehicles through and writes chain hashes back through
//! - `Digest256`  — the injected 256-bit digest capability, with
//!   `Sha256Digest` as the production implementation
//!
//! The engine's calculators and services live in `fahrlog-chain` and
//! `fahrlog-verify`; this crate defines only the boundaries they depend on.

pub mod digest;
pub mod traits;

pub use digest::{Digest256, Sha256Digest};
pub use traits::TripStore;
