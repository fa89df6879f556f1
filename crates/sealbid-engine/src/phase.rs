//! Phase classification.
//!
//! The phase of a round is never stored. It is derived from `now`, the
//! round's timestamps and its terminal flags, checked in this order:
//!
//! ```text
//! now <  commit_end                                  -> COMMIT
//! now <  reveal_end                                  -> REVEAL
//! !finalized                                         -> FINALIZE_PENDING
//! !settled && winner && now <= settle_deadline       -> AWAIT_PAYMENT
//! otherwise                                          -> ENDED
//! ```

use sealbid_types::{Result, Round, RoundPhase, SealbidError, Timestamp};

/// Classify `round` as seen at `now`.
#[must_use]
pub fn classify(now: Timestamp, round: &Round) -> RoundPhase {
    if now < round.commit_end {
        return RoundPhase::Commit;
    }
    if now < round.reveal_end {
        return RoundPhase::Reveal;
    }
    if !round.finalized {
        return RoundPhase::FinalizePending;
    }
    let within_deadline = round.settle_deadline.is_some_and(|deadline| now <= deadline);
    if !round.settled && round.has_winner() && within_deadline {
        return RoundPhase::AwaitPayment;
    }
    RoundPhase::Ended
}

/// Gate an operation on the round being in `expected`.
///
/// # Errors
/// Returns [`SealbidError::PhaseViolation`] carrying the actual phase.
pub fn require_phase(
    now: Timestamp,
    round: &Round,
    operation: &'static str,
    expected: RoundPhase,
) -> Result<()> {
    let phase = classify(now, round);
    if phase == expected {
        Ok(())
    } else {
        Err(SealbidError::PhaseViolation { operation, phase })
    }
}
