//! Commitment hashing for sealed bids.
//!
//! `H(amount, salt) = SHA-256("sealbid:commitment:v1:" || amount || 0x00 || salt)`
//!
//! The amount is hashed as its normalized decimal string, so `100` and
//! `100.00` commit identically. Verification is a bit-exact comparison.

use sealbid_types::{Amount, Commitment, Salt, constants};
use sha2::{Digest, Sha256};

/// Compute the commitment a bidder submits for `(amount, salt)`.
#[must_use]
pub fn compute_commitment(amount: Amount, salt: &Salt) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(constants::COMMITMENT_DOMAIN);
    hasher.update(amount.normalize().to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(salt.as_bytes());

    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    Commitment(out)
}

/// Whether `(amount, salt)` reproduces `expected` exactly.
#[must_use]
pub fn verify_commitment(amount: Amount, salt: &Salt, expected: &Commitment) -> bool {
    compute_commitment(amount, salt) == *expected
}
