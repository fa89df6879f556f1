//! Observable notifications emitted by the coordinator.
//!
//! Events are buffered per call and published only when the call commits,
//! so a failed operation never leaves a notification behind.

use serde::{Deserialize, Serialize};

use crate::{Amount, AssetId, ParticipantId, RoundId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    RoundStarted {
        round: RoundId,
        asset_id: AssetId,
        seller: ParticipantId,
        reserve_price: Amount,
        deposit_price: Amount,
        commit_end: Timestamp,
        reveal_end: Timestamp,
    },
    BidCommitted {
        round: RoundId,
        bidder: ParticipantId,
        sequence: u64,
        deposit: Amount,
    },
    BidRevealed {
        round: RoundId,
        bidder: ParticipantId,
        amount: Amount,
    },
    Finalized {
        round: RoundId,
        winner: Option<ParticipantId>,
        highest_bid: Amount,
        second_bid: Amount,
        clearing_price: Amount,
    },
    AssetClaimed {
        round: RoundId,
        winner: ParticipantId,
        paid: Amount,
    },
    AssetReclaimed {
        round: RoundId,
        seller: ParticipantId,
        forfeited_deposit: Amount,
    },
    DepositWithdrawn {
        round: RoundId,
        participant: ParticipantId,
        amount: Amount,
    },
}

impl AuctionEvent {
    /// The round this event belongs to.
    #[must_use]
    pub fn round(&self) -> RoundId {
        match self {
            Self::RoundStarted { round, .. }
            | Self::BidCommitted { round, .. }
            | Self::BidRevealed { round, .. }
            | Self::Finalized { round, .. }
            | Self::AssetClaimed { round, .. }
            | Self::AssetReclaimed { round, .. }
            | Self::DepositWithdrawn { round, .. } => *round,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoundStarted { .. } => "ROUND_STARTED",
            Self::BidCommitted { .. } => "BID_COMMITTED",
            Self::BidRevealed { .. } => "BID_REVEALED",
            Self::Finalized { .. } => "FINALIZED",
            Self::AssetClaimed { .. } => "ASSET_CLAIMED",
            Self::AssetReclaimed { .. } => "ASSET_RECLAIMED",
            Self::DepositWithdrawn { .. } => "DEPOSIT_WITHDRAWN",
        }
    }
}
