//! Second-price clearing and deposit offset.
//!
//! The winner pays `deal = max(second_bid, reserve_price)`. Their deposit
//! `d` is applied against it:
//!
//! - `deal >= d`: the whole deposit moves to the seller, and the winner
//!   still owes `deal - d`.
//! - `deal < d`: `deal` moves to the seller, the winner keeps `d - deal`
//!   as a withdrawable balance, and owes nothing.
//!
//! Either way `moved_to_seller + clearing_price == deal`, and no value is
//! created or destroyed.

use rust_decimal::Decimal;
use sealbid_types::{Amount, Round};

/// The result of offsetting the winner's deposit against the deal price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Second price, floored at the reserve.
    pub deal_price: Amount,
    /// Amount the winner still owes.
    pub clearing_price: Amount,
    /// Deposit moved from the winner to the seller at finalize.
    pub moved_to_seller: Amount,
    /// Winner's deposit balance left after the offset.
    pub winner_remaining: Amount,
}

/// `max(second_bid, reserve_price)`.
#[must_use]
pub fn deal_price(round: &Round) -> Amount {
    round.second_bid.max(round.reserve_price)
}

/// Offset `winner_deposit` against the round's deal price.
#[must_use]
pub fn compute_settlement(round: &Round, winner_deposit: Amount) -> Settlement {
    let deal = deal_price(round);
    if deal >= winner_deposit {
        Settlement {
            deal_price: deal,
            clearing_price: deal - winner_deposit,
            moved_to_seller: winner_deposit,
            winner_remaining: Decimal::ZERO,
        }
    } else {
        Settlement {
            deal_price: deal,
            clearing_price: Decimal::ZERO,
            moved_to_seller: deal,
            winner_remaining: winner_deposit - deal,
        }
    }
}
