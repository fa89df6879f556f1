//! Settlement transitions on a staged round.
//!
//! Each function checks its preconditions and mutates the given
//! [`RoundEntry`] in place. They do no I/O: the coordinator runs them on a
//! copy, checks funds conservation, writes the copy back and only then
//! moves custody or funds.

use rust_decimal::Decimal;
use sealbid_engine::{Settlement, classify, compute_settlement, require_phase};
use sealbid_ledger::RoundEntry;
use sealbid_types::{Amount, ParticipantId, Result, RoundPhase, SealbidError, Timestamp};

/// What `finalize` decided for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// No valid reveal: the round is settled and the asset goes back.
    Unsold,
    /// A winner exists and the deposit offset was applied.
    Sold(Settlement),
}

fn require_finalized(entry: &RoundEntry, operation: &'static str, now: Timestamp) -> Result<()> {
    if entry.round.finalized {
        Ok(())
    } else {
        Err(SealbidError::PhaseViolation {
            operation,
            phase: classify(now, &entry.round),
        })
    }
}

/// Close bidding and apply the deposit offset.
///
/// # Errors
/// - `AlreadyFinalized` on a second call
/// - `PhaseViolation` before the reveal window has closed
pub fn finalize(entry: &mut RoundEntry, now: Timestamp) -> Result<FinalizeOutcome> {
    let round = &mut entry.round;
    if round.finalized {
        return Err(SealbidError::AlreadyFinalized(round.id));
    }
    require_phase(now, round, "finalize", RoundPhase::FinalizePending)?;
    round.finalized = true;

    let Some(winner) = round.highest_bidder else {
        round.clearing_price = Decimal::ZERO;
        round.settled = true;
        return Ok(FinalizeOutcome::Unsold);
    };

    let settlement = compute_settlement(round, entry.bids.deposit_of(winner));
    round.clearing_price = settlement.clearing_price;
    round.settle_deadline = Some(now.saturating_add_secs(round.settle_secs));
    entry
        .bids
        .move_deposit(winner, round.seller, settlement.moved_to_seller)?;
    Ok(FinalizeOutcome::Sold(settlement))
}

/// Winner pays what is still owed and takes the asset.
///
/// Returns the payment credited to the seller.
///
/// # Errors
/// - `PhaseViolation` before finalize
/// - `Unauthorized` unless `caller` is the winner
/// - `NothingToClaim` once settled
/// - `DeadlineExceeded` if still owing after the deadline
/// - `PaymentMismatch` unless `payment` equals the amount owed
/// - `AmountOverflow` if the seller's balance cannot hold the payment
pub fn pay_and_claim(
    entry: &mut RoundEntry,
    caller: ParticipantId,
    payment: Amount,
    now: Timestamp,
) -> Result<Amount> {
    require_finalized(entry, "pay_and_claim", now)?;
    let round = &mut entry.round;
    if !round.is_winner(caller) {
        return Err(SealbidError::Unauthorized {
            operation: "pay_and_claim",
            caller,
        });
    }
    if round.settled {
        return Err(SealbidError::NothingToClaim);
    }

    // Owing nothing means no deadline applies.
    let owing = round.clearing_price > Decimal::ZERO;
    if let Some(deadline) = round.settle_deadline.filter(|d| owing && now > *d) {
        return Err(SealbidError::DeadlineExceeded { deadline, now });
    }
    if payment != round.clearing_price {
        return Err(SealbidError::PaymentMismatch {
            required: round.clearing_price,
            attached: payment,
        });
    }

    entry.bids.credit(round.seller, payment)?;
    round.clearing_price = Decimal::ZERO;
    round.settled = true;
    Ok(payment)
}

/// Seller takes the asset back after an unpaid deadline, keeping the
/// winner's remaining deposit.
///
/// Returns the forfeited deposit.
///
/// # Errors
/// - `PhaseViolation` before finalize or while the winner may still pay
/// - `Unauthorized` unless `caller` is the seller
/// - `AlreadySettled` once settled
/// - `WinnerPaidInFull` if the winner owes nothing
pub fn seller_reclaim(
    entry: &mut RoundEntry,
    caller: ParticipantId,
    now: Timestamp,
) -> Result<Amount> {
    require_finalized(entry, "seller_reclaim", now)?;
    let round = &mut entry.round;
    if caller != round.seller {
        return Err(SealbidError::Unauthorized {
            operation: "seller_reclaim",
            caller,
        });
    }
    if round.settled {
        return Err(SealbidError::AlreadySettled(round.id));
    }
    let Some(winner) = round.highest_bidder else {
        return Err(SealbidError::Internal(format!(
            "{} finalized without winner but not settled",
            round.id
        )));
    };
    if round.clearing_price.is_zero() {
        return Err(SealbidError::WinnerPaidInFull(round.id));
    }
    if round.settle_deadline.is_none_or(|deadline| now <= deadline) {
        return Err(SealbidError::PhaseViolation {
            operation: "seller_reclaim",
            phase: classify(now, round),
        });
    }

    let forfeited = entry.bids.deposit_of(winner);
    entry.bids.move_deposit(winner, round.seller, forfeited)?;
    round.settled = true;
    Ok(forfeited)
}

/// Zero `caller`'s deposit balance and return it.
///
/// # Errors
/// - `PhaseViolation` before finalize
/// - `NoDeposit` if the balance is zero
pub fn withdraw(entry: &mut RoundEntry, caller: ParticipantId, now: Timestamp) -> Result<Amount> {
    require_finalized(entry, "withdraw_deposits", now)?;
    let amount = entry.bids.deposit_of(caller);
    if amount.is_zero() {
        return Err(SealbidError::NoDeposit);
    }
    entry.bids.entry(caller).deposit_balance = Decimal::ZERO;
    Ok(amount)
}
