//! # sealbid-ledger
//!
//! **State plane**: the round history and the per-round bid records.
//!
//! ## Architecture
//!
//! 1. **RoundStore**: append-only, id-indexed rounds with one active pointer
//! 2. **commit_ledger**: admits commitments and accumulates deposits
//! 3. **reveal_ledger**: verifies reveals and folds them into the ranking
//!
//! ## Bid Flow
//!
//! ```text
//! commit(hash, deposit) -> BidRecord{commitment, sequence, deposit}
//!     -> reveal(amount, salt) -> verify_commitment -> apply_reveal -> Round{highest, second}
//! ```
//!
//! Every operation validates fully before it mutates, so a rejected call
//! leaves the store untouched.

pub mod commit_ledger;
pub mod reveal_ledger;
pub mod round_store;

pub use commit_ledger::commit;
pub use reveal_ledger::reveal;
pub use round_store::{RoundEntry, RoundStore};
