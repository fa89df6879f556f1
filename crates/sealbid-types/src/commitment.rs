//! Commitment and salt primitives for sealed bidding.
//!
//! A bidder submits `Commitment = H(amount, salt)` during COMMIT and later
//! discloses `(amount, salt)` during REVEAL. The hash function itself lives
//! in `sealbid-engine::commitment`; this module only carries the values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte commitment hash binding a bid amount and a secret salt.
///
/// The all-zero value is reserved to mean "no commitment" and is never
/// accepted by the commit ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// Secret blinding value chosen by the bidder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(pub [u8; 32]);

impl Salt {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// Salts are secrets; keep them out of logs.
impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Salt {
    /// Fresh random salt.
    #[must_use]
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}
