//! Round model: one auction instance for one asset.
//!
//! A round moves through five phases derived from its stored timestamps
//! and terminal flags:
//! **COMMIT → REVEAL → FINALIZE_PENDING → AWAIT_PAYMENT → ENDED**
//!
//! `finalized` and `settled` each flip exactly once and are never reset.
//! Once a flag is set, the ranking and deposit-offset fields are frozen.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AssetId, ParticipantId, Result, RoundId, SealbidError, Timestamp};

/// Currency amount (non-negative).
pub type Amount = Decimal;

/// The five phases a round can be observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Accepting commitments.
    Commit,
    /// Accepting reveals.
    Reveal,
    /// Reveal window closed; waiting for someone to call `finalize`.
    FinalizePending,
    /// Finalized with a winner who has not yet settled.
    AwaitPayment,
    /// Terminal, or past the settle deadline.
    Ended,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => write!(f, "COMMIT"),
            Self::Reveal => write!(f, "REVEAL"),
            Self::FinalizePending => write!(f, "FINALIZE_PENDING"),
            Self::AwaitPayment => write!(f, "AWAIT_PAYMENT"),
            Self::Ended => write!(f, "ENDED"),
        }
    }
}

/// Seller-chosen parameters for a new round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTerms {
    pub asset_id: AssetId,
    pub seller: ParticipantId,
    pub reserve_price: Amount,
    /// Exact deposit each commit must attach. Derived from the reserve by
    /// [`AuctionConfig::deposit_for`](crate::AuctionConfig::deposit_for).
    pub deposit_price: Amount,
    pub commit_secs: u64,
    pub reveal_secs: u64,
    pub settle_secs: u64,
}

/// One auction round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub asset_id: AssetId,
    pub seller: ParticipantId,
    pub reserve_price: Amount,
    pub deposit_price: Amount,

    pub start_time: Timestamp,
    /// Exclusive upper bound of COMMIT.
    pub commit_end: Timestamp,
    /// Exclusive upper bound of REVEAL.
    pub reveal_end: Timestamp,
    pub settle_secs: u64,
    /// Set by `finalize` when there is a winner.
    pub settle_deadline: Option<Timestamp>,

    pub highest_bidder: Option<ParticipantId>,
    pub highest_bid: Amount,
    pub second_bid: Amount,
    /// Amount the winner still owes after the deposit offset.
    pub clearing_price: Amount,

    pub finalized: bool,
    pub settled: bool,

    /// Last commit sequence number handed out in this round.
    pub commit_sequence_counter: u64,
}

impl Round {
    /// Open a round at `start_time` with the given terms.
    ///
    /// # Errors
    /// - `InvalidReservePrice` if the reserve is not strictly positive
    /// - `InvalidDuration` if the commit or reveal window is empty, or the
    ///   timeline overflows the clock's range
    pub fn open(id: RoundId, terms: &RoundTerms, start_time: Timestamp) -> Result<Self> {
        if terms.reserve_price <= Decimal::ZERO {
            return Err(SealbidError::InvalidReservePrice {
                reserve: terms.reserve_price,
            });
        }
        if terms.commit_secs == 0 {
            return Err(SealbidError::InvalidDuration {
                phase: "commit",
                secs: 0,
            });
        }
        if terms.reveal_secs == 0 {
            return Err(SealbidError::InvalidDuration {
                phase: "reveal",
                secs: 0,
            });
        }

        let commit_end = start_time
            .checked_add_secs(terms.commit_secs)
            .ok_or(SealbidError::InvalidDuration {
                phase: "commit",
                secs: terms.commit_secs,
            })?;
        let reveal_end = commit_end
            .checked_add_secs(terms.reveal_secs)
            .ok_or(SealbidError::InvalidDuration {
                phase: "reveal",
                secs: terms.reveal_secs,
            })?;

        Ok(Self {
            id,
            asset_id: terms.asset_id,
            seller: terms.seller,
            reserve_price: terms.reserve_price,
            deposit_price: terms.deposit_price,
            start_time,
            commit_end,
            reveal_end,
            settle_secs: terms.settle_secs,
            settle_deadline: None,
            highest_bidder: None,
            highest_bid: Decimal::ZERO,
            second_bid: Decimal::ZERO,
            clearing_price: Decimal::ZERO,
            finalized: false,
            settled: false,
            commit_sequence_counter: 0,
        })
    }

    #[must_use]
    pub fn has_winner(&self) -> bool {
        self.highest_bidder.is_some()
    }

    #[must_use]
    pub fn is_winner(&self, participant: ParticipantId) -> bool {
        self.highest_bidder == Some(participant)
    }

    /// Hand out the next commit sequence number.
    pub fn next_commit_sequence(&mut self) -> u64 {
        self.commit_sequence_counter += 1;
        self.commit_sequence_counter
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl RoundTerms {
    /// Terms with reserve 100, deposit 50 and 100-second windows.
    #[must_use]
    pub fn dummy(seller: ParticipantId) -> Self {
        Self {
            asset_id: AssetId(1),
            seller,
            reserve_price: Decimal::new(100, 0),
            deposit_price: Decimal::new(50, 0),
            commit_secs: 100,
            reveal_secs: 100,
            settle_secs: 100,
        }
    }
}
