//! # sealbid-engine
//!
//! **Pure deterministic auction rules for SealBid.**
//!
//! The engine is the compute plane. It classifies rounds, verifies
//! commitments, ranks revealed bids, and computes the deposit offset. It has:
//!
//! - **Zero side effects**: no storage, no transfers, no clock reads
//! - **Deterministic output**: same inputs -> same result on every replay
//! - **Sequence-based tie-break**: earlier commitment wins equal bids

pub mod clearing;
pub mod commitment;
pub mod phase;
pub mod ranking;

pub use clearing::{Settlement, compute_settlement, deal_price};
pub use commitment::{compute_commitment, verify_commitment};
pub use phase::{classify, require_phase};
pub use ranking::{RankOutcome, apply_reveal};
