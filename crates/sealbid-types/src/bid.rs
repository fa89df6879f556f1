//! Per-participant bid state within one round.
//!
//! Commitment, sequence, deposit balance and revealed amount live together
//! in a single [`BidRecord`] so the four fields change atomically.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Amount, Commitment, ParticipantId, Result, SealbidError};

/// One participant's record in one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    /// Live commitment; replaced by every re-commit.
    pub commitment: Option<Commitment>,
    /// Sequence number of the live commitment (0 = never committed).
    pub commit_sequence: u64,
    /// Withdrawable balance. The seller's record accumulates proceeds here.
    pub deposit_balance: Amount,
    /// Set once by a successful reveal.
    pub revealed_amount: Option<Amount>,
}

impl BidRecord {
    #[must_use]
    pub fn has_revealed(&self) -> bool {
        self.revealed_amount.is_some()
    }
}

/// All bid records of one round, keyed by participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidBook {
    records: HashMap<ParticipantId, BidRecord>,
}

impl BidBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `participant`, or an empty record if none exists.
    #[must_use]
    pub fn get(&self, participant: ParticipantId) -> BidRecord {
        self.records.get(&participant).cloned().unwrap_or_default()
    }

    /// Mutable record for `participant`, created empty on first access.
    pub fn entry(&mut self, participant: ParticipantId) -> &mut BidRecord {
        self.records.entry(participant).or_default()
    }

    #[must_use]
    pub fn deposit_of(&self, participant: ParticipantId) -> Amount {
        self.records
            .get(&participant)
            .map_or(Decimal::ZERO, |r| r.deposit_balance)
    }

    /// Add `amount` to `participant`'s deposit balance.
    ///
    /// # Errors
    /// Returns [`SealbidError::AmountOverflow`] if the balance would overflow;
    /// the book is left unchanged.
    pub fn credit(&mut self, participant: ParticipantId, amount: Amount) -> Result<Amount> {
        let record = self.entry(participant);
        record.deposit_balance = record
            .deposit_balance
            .checked_add(amount)
            .ok_or(SealbidError::AmountOverflow { context: "deposit balance" })?;
        Ok(record.deposit_balance)
    }

    /// Move `amount` of deposit balance from one participant to another.
    ///
    /// Callers must ensure `from` holds at least `amount`.
    ///
    /// # Errors
    /// Returns [`SealbidError::AmountOverflow`] if `to`'s balance would
    /// overflow; the book is left unchanged.
    pub fn move_deposit(
        &mut self,
        from: ParticipantId,
        to: ParticipantId,
        amount: Amount,
    ) -> Result<()> {
        self.credit(to, amount)?;
        self.entry(from).deposit_balance -= amount;
        Ok(())
    }

    /// Sum of every participant's deposit balance.
    ///
    /// # Errors
    /// Returns [`SealbidError::AmountOverflow`] if the sum is not representable.
    pub fn total_deposits(&self) -> Result<Amount> {
        self.records
            .values()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.deposit_balance))
            .ok_or(SealbidError::AmountOverflow { context: "total deposits" })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &BidRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
