//! # sealbid-types
//!
//! Shared types, errors, and configuration for the **SealBid** auction
//! coordinator.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RoundId`], [`ParticipantId`], [`AssetId`]
//! - **Time**: [`Timestamp`], the [`Clock`] authority trait, [`SystemClock`]
//! - **Round model**: [`Round`], [`RoundTerms`], [`RoundPhase`], [`Amount`]
//! - **Bid model**: [`BidRecord`], [`BidBook`], [`Commitment`], [`Salt`]
//! - **Notifications**: [`AuctionEvent`]
//! - **Configuration**: [`AuctionConfig`]
//! - **Errors**: [`SealbidError`] with `SB_ERR_` prefix codes
//! - **Constants**: defaults, domain tags, acknowledgement values

pub mod bid;
pub mod clock;
pub mod commitment;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod round;

pub use bid::*;
pub use clock::*;
pub use commitment::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use round::*;

// Constants are accessed via `sealbid_types::constants::FOO`
// (not re-exported to avoid name collisions).
