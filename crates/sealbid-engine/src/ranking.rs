//! Top-2 ranking of revealed bids.
//!
//! A round only tracks the highest bidder, the highest amount, and the
//! second-highest amount. Each valid reveal (already checked against the
//! reserve) is folded in with these rules:
//!
//! 1. `amount > highest`: the old highest drops to second, bidder leads.
//! 2. `amount == highest` and the bidder committed earlier (lower commit
//!    sequence) than the leader: bidder takes the lead at the same amount.
//!    The displaced amount is assigned to second, never added to it.
//! 3. `amount > second`: amount becomes the new second.
//!
//! Ties are broken only by commit sequence, so the final ranking does not
//! depend on the order in which reveals arrive.

use sealbid_types::{Amount, BidBook, ParticipantId, Round};

/// How a reveal changed the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOutcome {
    /// Rule 1: strictly higher than the previous leader.
    NewHighest { displaced: Option<ParticipantId> },
    /// Rule 2: equal to the leader but committed earlier.
    WonTieBreak { displaced: ParticipantId },
    /// Rule 3: below the leader, above the previous second.
    NewSecond,
    /// Did not move either slot.
    Unranked,
}

/// Fold a verified, reserve-meeting reveal into the round's ranking.
///
/// `book` supplies commit sequence numbers for the tie-break.
pub fn apply_reveal(
    round: &mut Round,
    book: &BidBook,
    bidder: ParticipantId,
    amount: Amount,
) -> RankOutcome {
    debug_assert!(amount >= round.reserve_price);

    if amount > round.highest_bid {
        let displaced = round.highest_bidder;
        round.second_bid = round.highest_bid;
        round.highest_bid = amount;
        round.highest_bidder = Some(bidder);
        return RankOutcome::NewHighest { displaced };
    }

    if amount == round.highest_bid {
        if let Some(leader) = round.highest_bidder {
            let ours = book.get(bidder).commit_sequence;
            let theirs = book.get(leader).commit_sequence;
            if ours < theirs {
                round.highest_bidder = Some(bidder);
                round.second_bid = amount;
                return RankOutcome::WonTieBreak { displaced: leader };
            }
        }
    }

    if amount > round.second_bid {
        round.second_bid = amount;
        return RankOutcome::NewSecond;
    }

    RankOutcome::Unranked
}
