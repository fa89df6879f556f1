//! # sealbid-settlement
//!
//! **Finality Plane**: finalize, pay-and-claim, seller reclaim and deposit
//! withdrawal, plus the [`AuctionCoordinator`] facade tying every plane
//! together.
//!
//! ## Architecture
//!
//! Every custody-transferring call:
//! 1. Enters the [`ReentrancyGuard`] (nested calls are rejected)
//! 2. Stages the state change on a copy of the round
//! 3. Checks funds conservation on the staged copy
//! 4. Writes the staged round back to the store
//! 5. Calls the external [`AssetRegistry`] / [`FundsGateway`]
//! 6. Restores the original round if the transfer was refused
//!
//! The result is all-or-nothing: a refused transfer never leaves a round
//! marked settled without the matching custody change.

pub mod collaborators;
pub mod coordinator;
pub mod funds_conservation;
pub mod memory;
pub mod reentrancy;
pub mod settle;

pub use collaborators::{AssetRegistry, FundsGateway, GuardedCall, TransferCallbacks};
pub use coordinator::{AuctionCoordinator, RoundOutcome, RoundTimeline};
pub use funds_conservation::FundsConservation;
pub use memory::{ForwardToCoordinator, InMemoryFunds, InMemoryRegistry, PayeeHook, RecipientHook};
pub use reentrancy::{GuardHold, ReentrancyGuard};
pub use settle::FinalizeOutcome;
