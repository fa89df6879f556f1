//! Commit ledger: admits sealed bids during COMMIT.
//!
//! Each admitted commit:
//! 1. takes the next value of the round's commit sequence counter,
//! 2. replaces the participant's live commitment and sequence,
//! 3. adds the attached deposit to the participant's balance.
//!
//! Re-committing replaces the hash but deposits accumulate: every commit
//! must attach the full deposit price.

use sealbid_engine::require_phase;
use sealbid_types::{
    Amount, Commitment, ParticipantId, Result, RoundId, RoundPhase, SealbidError, Timestamp,
};

use crate::RoundStore;

/// Admit `commitment` from `participant` into the active round `round_id`.
///
/// Returns the commit sequence number assigned to this commitment.
///
/// # Errors
/// - `RoundNotActive` if `round_id` is not the active round
/// - `PhaseViolation` outside `[start_time, commit_end)`
/// - `InvalidCommitment` for the all-zero hash
/// - `Unauthorized` if the seller tries to bid
/// - `PaymentMismatch` unless exactly `deposit_price` is attached
/// - `AmountOverflow` if the accumulated deposit is not representable
pub fn commit(
    store: &mut RoundStore,
    round_id: RoundId,
    participant: ParticipantId,
    commitment: Commitment,
    attached_deposit: Amount,
    now: Timestamp,
) -> Result<u64> {
    if store.active_id() != Some(round_id) {
        return Err(SealbidError::RoundNotActive(round_id));
    }
    let entry = store.get_mut(round_id)?;
    let round = &mut entry.round;

    require_phase(now, round, "commit", RoundPhase::Commit)?;
    if now < round.start_time {
        return Err(SealbidError::PhaseViolation {
            operation: "commit",
            phase: RoundPhase::Commit,
        });
    }
    if commitment.is_zero() {
        return Err(SealbidError::InvalidCommitment);
    }
    if participant == round.seller {
        return Err(SealbidError::Unauthorized {
            operation: "commit",
            caller: participant,
        });
    }
    if attached_deposit != round.deposit_price {
        return Err(SealbidError::PaymentMismatch {
            required: round.deposit_price,
            attached: attached_deposit,
        });
    }

    let deposit_balance = entry.bids.credit(participant, attached_deposit)?;
    let sequence = round.next_commit_sequence();
    let record = entry.bids.entry(participant);
    record.commitment = Some(commitment);
    record.commit_sequence = sequence;

    tracing::debug!(
        round = %round_id,
        bidder = %participant.short(),
        sequence,
        deposit_balance = %deposit_balance,
        "commitment admitted"
    );
    Ok(sequence)
}
