//! Error types for the fahrlog integrity engine.
//!
//! Detection results (`ChainStatus`, `AggregateStatus`) are plain return
//! values, never errors. Only the backup import verifier converts a
//! detected failure into a `FahrlogError`, because import is the one place
//! where "reject the whole operation" is the correct action.

use thiserror::Error;

/// The unified error type for the fahrlog integrity engine.
#[derive(Debug, Error)]
pub enum FahrlogError {
    /// An audit-protected vehicle has trips without a chain hash at import.
    ///
    /// Always fatal to the import — there is no partial acceptance.
    #[error("vehicle '{vehicle}' is audit-protected but trip #{trip_id} has no chain hash")]
    MissingChainHash { vehicle: String, trip_id: i64 },

    /// A recomputed chain hash does not match the stored one.
    ///
    /// Reported with the first offending trip only; everything after it is
    /// transitively suspect anyway.
    #[error("chain of vehicle '{vehicle}' is broken at trip #{trip_id}")]
    BrokenChain { vehicle: String, trip_id: i64 },

    /// One or more per-vehicle aggregate digests do not match at restore time.
    #[error("aggregate integrity mismatch for: {}", .vehicles.join(", "))]
    AggregateTamperDetected { vehicles: Vec<String> },

    /// The storage collaborator failed to read or write.
    #[error("storage operation failed: {reason}")]
    StorageFailed { reason: String },
}

/// Convenience alias used throughout the fahrlog crates.
pub type FahrlogResult<T> = Result<T, FahrlogError>;
