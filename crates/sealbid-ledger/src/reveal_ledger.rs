//! Reveal admission: opens a sealed bid during REVEAL.
//!
//! A reveal is accepted only if it reproduces the live commitment bit for
//! bit and meets the reserve. Accepted reveals are recorded on the bid
//! record and folded into the round's top-2 ranking.

use sealbid_engine::{RankOutcome, apply_reveal, require_phase, verify_commitment};
use sealbid_types::{
    Amount, ParticipantId, Result, RoundId, RoundPhase, Salt, SealbidError, Timestamp,
};

use crate::RoundStore;

/// Reveal `(amount, salt)` for `participant` in round `round_id`.
///
/// # Errors
/// - `PhaseViolation` outside `[commit_end, reveal_end)`
/// - `RevealAlreadyDone` on a second reveal
/// - `NoCommitment` if the participant never committed
/// - `CommitmentMismatch` if `(amount, salt)` does not hash to the commitment
/// - `InvalidRevealedPrice` if `amount` is below the reserve
pub fn reveal(
    store: &mut RoundStore,
    round_id: RoundId,
    participant: ParticipantId,
    amount: Amount,
    salt: &Salt,
    now: Timestamp,
) -> Result<RankOutcome> {
    let entry = store.get_mut(round_id)?;
    require_phase(now, &entry.round, "reveal", RoundPhase::Reveal)?;

    let record = entry.bids.get(participant);
    if record.has_revealed() {
        return Err(SealbidError::RevealAlreadyDone);
    }
    let commitment = record.commitment.ok_or(SealbidError::NoCommitment)?;
    if !verify_commitment(amount, salt, &commitment) {
        return Err(SealbidError::CommitmentMismatch);
    }
    if amount < entry.round.reserve_price {
        return Err(SealbidError::InvalidRevealedPrice {
            amount,
            reserve: entry.round.reserve_price,
        });
    }

    entry.bids.entry(participant).revealed_amount = Some(amount);
    let outcome = apply_reveal(&mut entry.round, &entry.bids, participant, amount);

    tracing::debug!(
        round = %round_id,
        bidder = %participant.short(),
        %amount,
        ?outcome,
        "reveal accepted"
    );
    Ok(outcome)
}
