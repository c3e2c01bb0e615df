//! The injected digest capability.
//!
//! The calculators in `fahrlog-chain` are written against `Digest256`
//! rather than a concrete hash so the chaining logic stays independent of
//! the cryptographic primitive and can be exercised with a fake in tests.
//! Production code always uses `Sha256Digest`.

use sha2::{Digest, Sha256};

/// Produce a 256-bit digest of a byte sequence.
pub trait Digest256: Send + Sync {
    /// Digest `input` into 32 bytes.
    fn digest(&self, input: &[u8]) -> [u8; 32];

    /// Digest `input` and render the result as lowercase hex (64 chars).
    fn digest_hex(&self, input: &[u8]) -> String {
        hex::encode(self.digest(input))
    }
}

/// The production digest: SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl Digest256 for Sha256Digest {
    fn digest(&self, input: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.finalize().into()
    }
}
