//! Round store: the append-only history of auction rounds.
//!
//! Rounds are keyed by a strictly increasing [`RoundId`] and never removed,
//! so settled rounds stay queryable and late deposit withdrawals keep
//! working. Exactly one round is "active"; a new one may only be opened
//! once the active round has settled.

use std::collections::BTreeMap;

use sealbid_types::{BidBook, Result, Round, RoundId, RoundTerms, SealbidError, Timestamp};

/// A round together with its bid records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEntry {
    pub round: Round,
    pub bids: BidBook,
}

/// Owns every [`Round`] and [`BidBook`] the coordinator has created.
pub struct RoundStore {
    rounds: BTreeMap<RoundId, RoundEntry>,
    /// The current round, if any has been opened.
    active: Option<RoundId>,
    /// Id the next opened round receives.
    next_id: RoundId,
}

impl RoundStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rounds: BTreeMap::new(),
            active: None,
            next_id: RoundId::FIRST,
        }
    }

    /// Check that a new round may be opened.
    ///
    /// # Errors
    /// Returns `RoundInProgress` if the active round has not settled.
    pub fn ensure_can_open(&self) -> Result<()> {
        if let Some(id) = self.active {
            let entry = self.get(id)?;
            if !entry.round.settled {
                return Err(SealbidError::RoundInProgress(id));
            }
        }
        Ok(())
    }

    /// Build (but do not store) the next round.
    ///
    /// The caller escrows the asset, then hands the draft to [`insert`].
    ///
    /// [`insert`]: Self::insert
    ///
    /// # Errors
    /// - `RoundInProgress` if the active round is unsettled
    /// - any validation error from [`Round::open`]
    pub fn draft_round(&self, terms: &RoundTerms, now: Timestamp) -> Result<Round> {
        self.ensure_can_open()?;
        Round::open(self.next_id, terms, now)
    }

    /// Append a drafted round and make it the active one.
    ///
    /// # Errors
    /// - `RoundInProgress` if the active round is unsettled
    /// - `Internal` if the draft's id is stale
    pub fn insert(&mut self, round: Round) -> Result<RoundId> {
        self.ensure_can_open()?;
        if round.id != self.next_id {
            return Err(SealbidError::Internal(format!(
                "stale round draft {} (next is {})",
                round.id, self.next_id
            )));
        }

        let id = round.id;
        self.rounds.insert(
            id,
            RoundEntry {
                round,
                bids: BidBook::new(),
            },
        );
        self.active = Some(id);
        self.next_id = id.next();
        Ok(id)
    }

    /// The active round id, if any round exists.
    #[must_use]
    pub fn active_id(&self) -> Option<RoundId> {
        self.active
    }

    /// The active round id.
    ///
    /// # Errors
    /// Returns `NoActiveRound` before the first round is opened.
    pub fn require_active(&self) -> Result<RoundId> {
        self.active.ok_or(SealbidError::NoActiveRound)
    }

    /// Look up a round by id.
    ///
    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn get(&self, id: RoundId) -> Result<&RoundEntry> {
        self.rounds.get(&id).ok_or(SealbidError::RoundNotFound(id))
    }

    /// Mutable lookup by id.
    ///
    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn get_mut(&mut self, id: RoundId) -> Result<&mut RoundEntry> {
        self.rounds
            .get_mut(&id)
            .ok_or(SealbidError::RoundNotFound(id))
    }

    /// Copy of a round and its bids, for staging a change or rolling back.
    ///
    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn snapshot(&self, id: RoundId) -> Result<RoundEntry> {
        self.get(id).cloned()
    }

    /// Replace a stored round with `entry` (keyed by `entry.round.id`).
    ///
    /// # Errors
    /// Returns `RoundNotFound` if the round was never inserted.
    pub fn restore(&mut self, entry: RoundEntry) -> Result<()> {
        let slot = self.get_mut(entry.round.id)?;
        *slot = entry;
        Ok(())
    }

    /// All rounds in id order.
    pub fn history(&self) -> impl Iterator<Item = &RoundEntry> {
        self.rounds.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

impl Default for RoundStore {
    fn default() -> Self {
        Self::new()
    }
}
