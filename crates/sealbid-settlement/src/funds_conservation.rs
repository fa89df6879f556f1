//! Funds conservation invariant checker.
//!
//! Invariant enforced after every balance-moving step:
//! ```text
//! ∀ round: Σ(deposit balances) == Σ(inflows) - Σ(outflows)
//! ```
//!
//! Inflows are attached commit deposits and winner payments; outflows are
//! deposit withdrawals. Finalize and reclaim only move balances between
//! participants, so they must leave the sum untouched.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sealbid_types::{Amount, Result, RoundId, SealbidError};

/// Tracks per-round funds flowing in and out of the coordinator.
#[derive(Debug, Default)]
pub struct FundsConservation {
    /// Total attached value received per round.
    inflows: HashMap<RoundId, Amount>,
    /// Total value paid out per round.
    outflows: HashMap<RoundId, Amount>,
}

impl FundsConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value received by the coordinator for `round`.
    ///
    /// # Errors
    /// Returns [`SealbidError::AmountOverflow`] if the running total would
    /// overflow; nothing is recorded.
    pub fn record_inflow(&mut self, round: RoundId, amount: Amount) -> Result<()> {
        accumulate(&mut self.inflows, round, amount, "round inflows")
    }

    /// Record value paid out by the coordinator for `round`.
    ///
    /// # Errors
    /// Returns [`SealbidError::AmountOverflow`] if the running total would
    /// overflow; nothing is recorded.
    pub fn record_outflow(&mut self, round: RoundId, amount: Amount) -> Result<()> {
        accumulate(&mut self.outflows, round, amount, "round outflows")
    }

    #[must_use]
    pub fn total_inflow(&self, round: RoundId) -> Amount {
        self.inflows.get(&round).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_outflow(&self, round: RoundId) -> Amount {
        self.outflows.get(&round).copied().unwrap_or(Decimal::ZERO)
    }

    /// Balance the round's ledger should hold: inflows - outflows.
    #[must_use]
    pub fn expected_balance(&self, round: RoundId) -> Amount {
        // Outflows never exceed inflows, so this cannot overflow.
        self.total_inflow(round) - self.total_outflow(round)
    }

    /// Verify the recorded flows against the actual sum of balances.
    ///
    /// # Errors
    /// Returns [`SealbidError::FundsInvariantViolation`] if they differ.
    pub fn verify(&self, round: RoundId, actual: Amount) -> Result<()> {
        self.verify_pending(round, actual, Decimal::ZERO, Decimal::ZERO)
    }

    /// Verify a staged state that will also receive `inflow` and pay out
    /// `outflow` once committed.
    ///
    /// Passing also guarantees that recording those flows afterwards
    /// cannot overflow.
    ///
    /// # Errors
    /// - [`SealbidError::AmountOverflow`] if a running total would overflow
    /// - [`SealbidError::FundsInvariantViolation`] if they differ
    pub fn verify_pending(
        &self,
        round: RoundId,
        actual: Amount,
        inflow: Amount,
        outflow: Amount,
    ) -> Result<()> {
        let overflow = |context| SealbidError::AmountOverflow { context };
        let inflows = self
            .total_inflow(round)
            .checked_add(inflow)
            .ok_or_else(|| overflow("round inflows"))?;
        let outflows = self
            .total_outflow(round)
            .checked_add(outflow)
            .ok_or_else(|| overflow("round outflows"))?;
        let expected = inflows
            .checked_sub(outflows)
            .ok_or_else(|| overflow("expected balance"))?;
        if actual != expected {
            return Err(SealbidError::FundsInvariantViolation {
                reason: format!(
                    "{round}: balances {actual} != expected {expected} \
                     (inflows={}, outflows={}, pending_in={inflow}, pending_out={outflow})",
                    self.total_inflow(round),
                    self.total_outflow(round),
                ),
            });
        }
        Ok(())
    }
}

fn accumulate(
    totals: &mut HashMap<RoundId, Amount>,
    round: RoundId,
    amount: Amount,
    context: &'static str,
) -> Result<()> {
    let total = totals.entry(round).or_insert(Decimal::ZERO);
    *total = total
        .checked_add(amount)
        .ok_or(SealbidError::AmountOverflow { context })?;
    Ok(())
}
