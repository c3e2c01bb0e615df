//! # fahrlog-verify
//!
//! Backup restore verification for the fahrlog integrity engine.
//!
//! This crate provides [`engine::ImportVerifier`], the all-or-nothing gate
//! run before an imported snapshot is written to storage, plus the
//! export-side `seal_snapshot` that embeds the per-vehicle aggregate
//! digest map.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use fahrlog_verify::ImportVerifier;
//!
//! let verifier = ImportVerifier::new();
//! verifier.seal_snapshot(&mut snapshot);           // export
//! verifier.verify_snapshot(&restored_snapshot)?;   // import — Err = reject
//! ```

pub mod engine;

pub use engine::ImportVerifier;
