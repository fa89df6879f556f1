//! The auction coordinator.
//!
//! [`AuctionCoordinator`] is the single entry point participants call. It
//! reads the clock once per call, routes the call to the ledger or the
//! settlement transitions, and moves custody through the external
//! collaborators.
//!
//! Custody-transferring calls run under the [`ReentrancyGuard`] and follow
//! stage → verify → write → transfer. If the transfer is refused, the
//! pre-call snapshot is written back and the error is returned, so a
//! failed call leaves no trace. Events are buffered and published only on
//! success.

use rust_decimal::Decimal;
use sealbid_engine::{RankOutcome, classify};
use sealbid_ledger::{RoundEntry, RoundStore, commit, reveal};
use sealbid_types::{
    Amount, AssetId, AuctionConfig, AuctionEvent, BidRecord, Clock, Commitment, ParticipantId,
    Result, Round, RoundId, RoundPhase, RoundTerms, Salt, SealbidError, Timestamp,
    constants::{self, ASSET_RECEIVED_ACK},
};
use serde::{Deserialize, Serialize};

use crate::collaborators::{AssetRegistry, FundsGateway, GuardedCall, TransferCallbacks};
use crate::funds_conservation::FundsConservation;
use crate::reentrancy::ReentrancyGuard;
use crate::settle::{self, FinalizeOutcome};

/// Winner, amount still owed, and payment deadline of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Option<ParticipantId>,
    pub clearing_price: Amount,
    pub settle_deadline: Option<Timestamp>,
}

impl From<&Round> for RoundOutcome {
    fn from(round: &Round) -> Self {
        Self {
            winner: round.highest_bidder,
            clearing_price: round.clearing_price,
            settle_deadline: round.settle_deadline,
        }
    }
}

/// Phase boundaries of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimeline {
    pub start_time: Timestamp,
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    pub settle_deadline: Option<Timestamp>,
}

/// Callback handle given to collaborators during a guarded call.
///
/// Only ever built while the coordinator's guard is held, so every nested
/// call arriving through [`TransferCallbacks::reenter`] is refused.
struct GuardedCallbacks<'a> {
    coordinator: ParticipantId,
    guard: &'a ReentrancyGuard,
}

impl TransferCallbacks for GuardedCallbacks<'_> {
    fn on_asset_received(
        &mut self,
        operator: ParticipantId,
        from: ParticipantId,
        asset_id: AssetId,
    ) -> [u8; 4] {
        if operator == self.coordinator {
            ASSET_RECEIVED_ACK
        } else {
            tracing::warn!(%asset_id, from = %from.short(), "unsolicited asset refused");
            [0; 4]
        }
    }

    fn reenter(&mut self, call: GuardedCall) -> Result<()> {
        self.guard.check(call.operation())?;
        Err(SealbidError::Internal(format!(
            "{} called back outside a guarded operation",
            call.operation()
        )))
    }
}

/// Sealed-bid second-price auction coordinator.
pub struct AuctionCoordinator<R: AssetRegistry, F: FundsGateway, C: Clock> {
    /// Held for the whole of every custody-transferring call.
    guard: ReentrancyGuard,
    state: CoordinatorState<R, F, C>,
}

/// Everything a guarded call may read or mutate while the guard is held.
struct CoordinatorState<R: AssetRegistry, F: FundsGateway, C: Clock> {
    /// The coordinator's own account (custodian of escrowed assets).
    id: ParticipantId,
    config: AuctionConfig,
    store: RoundStore,
    registry: R,
    funds: F,
    clock: C,
    conservation: FundsConservation,
    /// Events published by committed calls, oldest first.
    events: Vec<AuctionEvent>,
}

impl<R: AssetRegistry, F: FundsGateway, C: Clock> AuctionCoordinator<R, F, C> {
    /// Create a coordinator acting as account `id`.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is invalid.
    pub fn new(
        id: ParticipantId,
        config: AuctionConfig,
        registry: R,
        funds: F,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            coordinator = %id.short(),
            deposit_ratio = %config.deposit_ratio,
            "coordinator ready"
        );
        Ok(Self {
            guard: ReentrancyGuard::new(),
            state: CoordinatorState {
                id,
                config,
                store: RoundStore::new(),
                registry,
                funds,
                clock,
                conservation: FundsConservation::new(),
                events: Vec::new(),
            },
        })
    }

    // =====================================================================
    // Operations
    // =====================================================================

    /// Escrow `asset_id` from `caller` and open a new round.
    ///
    /// # Errors
    /// - `InvalidDuration` / `InvalidReservePrice` for bad terms
    /// - `RoundInProgress` if the active round has not settled
    /// - `NotAssetOwner` / `CustodyNotApproved` for custody problems
    /// - `TransferFailure` if the registry refuses the escrow
    pub fn start_auction(
        &mut self,
        caller: ParticipantId,
        asset_id: AssetId,
        reserve_price: Amount,
        commit_secs: u64,
        reveal_secs: u64,
        settle_secs: u64,
    ) -> Result<RoundId> {
        self.guarded("start_auction", |this, guard| {
            let now = this.clock.now();
            this.config.check_window("commit", commit_secs)?;
            this.config.check_window("reveal", reveal_secs)?;
            this.config.check_window("settle", settle_secs)?;

            let terms = RoundTerms {
                asset_id,
                seller: caller,
                reserve_price,
                deposit_price: this.config.deposit_for(reserve_price)?,
                commit_secs,
                reveal_secs,
                settle_secs,
            };
            let draft = this.store.draft_round(&terms, now)?;

            if this.registry.owner_of(asset_id) != Some(caller) {
                return Err(SealbidError::NotAssetOwner(asset_id));
            }
            let approved = this.registry.is_approved_for_all(caller, this.id)
                || this.registry.get_approved(asset_id) == Some(this.id);
            if !approved {
                return Err(SealbidError::CustodyNotApproved(asset_id));
            }

            this.move_asset(guard, caller, this.id, asset_id)?;
            let round_id = this.store.insert(draft)?;

            let round = &this.store.get(round_id)?.round;
            tracing::info!(
                round = %round_id,
                %asset_id,
                seller = %caller.short(),
                reserve = %round.reserve_price,
                deposit = %round.deposit_price,
                commit_end = %round.commit_end,
                reveal_end = %round.reveal_end,
                "round started"
            );
            this.events.push(AuctionEvent::RoundStarted {
                round: round_id,
                asset_id,
                seller: caller,
                reserve_price: round.reserve_price,
                deposit_price: round.deposit_price,
                commit_end: round.commit_end,
                reveal_end: round.reveal_end,
            });
            Ok(round_id)
        })
    }

    /// Submit a sealed bid to the active round with `deposit` attached.
    ///
    /// Returns the commit sequence number.
    ///
    /// # Errors
    /// `NoActiveRound`, every error of [`commit`], and `AmountOverflow` if
    /// the round's inflow total cannot hold the deposit.
    pub fn commit_bid(
        &mut self,
        caller: ParticipantId,
        commitment: Commitment,
        deposit: Amount,
    ) -> Result<u64> {
        let this = &mut self.state;
        let now = this.clock.now();
        let round_id = this.store.require_active()?;
        let before = this.store.snapshot(round_id)?;
        let sequence = commit(&mut this.store, round_id, caller, commitment, deposit, now)?;
        if let Err(err) = this.conservation.record_inflow(round_id, deposit) {
            this.store.restore(before)?;
            return Err(err);
        }
        this.events.push(AuctionEvent::BidCommitted {
            round: round_id,
            bidder: caller,
            sequence,
            deposit,
        });
        Ok(sequence)
    }

    /// Open the caller's sealed bid in the active round.
    ///
    /// # Errors
    /// `NoActiveRound` plus every error of [`reveal`].
    pub fn reveal_bid(
        &mut self,
        caller: ParticipantId,
        amount: Amount,
        salt: &Salt,
    ) -> Result<RankOutcome> {
        let this = &mut self.state;
        let now = this.clock.now();
        let round_id = this.store.require_active()?;
        let outcome = reveal(&mut this.store, round_id, caller, amount, salt, now)?;
        this.events.push(AuctionEvent::BidRevealed {
            round: round_id,
            bidder: caller,
            amount,
        });
        Ok(outcome)
    }

    /// Finalize the active round.
    ///
    /// # Errors
    /// `NoActiveRound` plus every error of [`finalize_round`](Self::finalize_round).
    pub fn finalize(&mut self) -> Result<RoundOutcome> {
        let round_id = self.state.store.require_active()?;
        self.finalize_round(round_id)
    }

    /// Close round `round_id` once its reveal window has ended.
    ///
    /// # Errors
    /// - `AlreadyFinalized`, `PhaseViolation`
    /// - `TransferFailure` if returning an unsold asset fails
    pub fn finalize_round(&mut self, round_id: RoundId) -> Result<RoundOutcome> {
        self.guarded("finalize", |this, guard| {
            let now = this.clock.now();
            let before = this.store.snapshot(round_id)?;
            let mut staged = before.clone();
            let outcome = settle::finalize(&mut staged, now)?;
            this.conservation
                .verify(round_id, staged.bids.total_deposits()?)?;
            this.store.restore(staged)?;

            if outcome == FinalizeOutcome::Unsold {
                let (seller, asset_id) = (before.round.seller, before.round.asset_id);
                this.transfer_or_rollback(before, |this| {
                    this.move_asset(guard, this.id, seller, asset_id)
                })?;
            }

            let round = &this.store.get(round_id)?.round;
            match outcome {
                FinalizeOutcome::Unsold => {
                    tracing::info!(round = %round_id, "round closed unsold");
                }
                FinalizeOutcome::Sold(s) => tracing::info!(
                    round = %round_id,
                    winner = ?round.highest_bidder.map(|w| w.short()),
                    deal = %s.deal_price,
                    clearing = %s.clearing_price,
                    "round finalized"
                ),
            }
            this.events.push(AuctionEvent::Finalized {
                round: round_id,
                winner: round.highest_bidder,
                highest_bid: round.highest_bid,
                second_bid: round.second_bid,
                clearing_price: round.clearing_price,
            });
            Ok(RoundOutcome::from(round))
        })
    }

    /// Winner pays the clearing price and receives the asset.
    ///
    /// # Errors
    /// Every error of [`settle::pay_and_claim`], `ReentrantCall`,
    /// `AmountOverflow` if the round's totals cannot hold the payment, and
    /// `TransferFailure` if the asset transfer is refused.
    pub fn pay_and_claim(
        &mut self,
        round_id: RoundId,
        caller: ParticipantId,
        payment: Amount,
    ) -> Result<()> {
        self.guarded("pay_and_claim", |this, guard| {
            let now = this.clock.now();
            let before = this.store.snapshot(round_id)?;
            let mut staged = before.clone();
            let paid = settle::pay_and_claim(&mut staged, caller, payment, now)?;
            this.conservation.verify_pending(
                round_id,
                staged.bids.total_deposits()?,
                paid,
                Decimal::ZERO,
            )?;
            this.store.restore(staged)?;

            let asset_id = before.round.asset_id;
            this.transfer_or_rollback(before, |this| {
                this.move_asset(guard, this.id, caller, asset_id)
            })?;

            this.conservation.record_inflow(round_id, paid)?;
            tracing::info!(round = %round_id, winner = %caller.short(), %paid, "asset claimed");
            this.events.push(AuctionEvent::AssetClaimed {
                round: round_id,
                winner: caller,
                paid,
            });
            Ok(())
        })
    }

    /// Seller recovers the asset after the winner missed the deadline.
    ///
    /// Returns the winner's forfeited deposit.
    ///
    /// # Errors
    /// Every error of [`settle::seller_reclaim`], `ReentrantCall`, and
    /// `TransferFailure` if the asset transfer is refused.
    pub fn seller_reclaim(&mut self, round_id: RoundId, caller: ParticipantId) -> Result<Amount> {
        self.guarded("seller_reclaim", |this, guard| {
            let now = this.clock.now();
            let before = this.store.snapshot(round_id)?;
            let mut staged = before.clone();
            let forfeited = settle::seller_reclaim(&mut staged, caller, now)?;
            this.conservation
                .verify(round_id, staged.bids.total_deposits()?)?;
            this.store.restore(staged)?;

            let asset_id = before.round.asset_id;
            this.transfer_or_rollback(before, |this| {
                this.move_asset(guard, this.id, caller, asset_id)
            })?;

            tracing::info!(round = %round_id, %forfeited, "asset reclaimed by seller");
            this.events.push(AuctionEvent::AssetReclaimed {
                round: round_id,
                seller: caller,
                forfeited_deposit: forfeited,
            });
            Ok(forfeited)
        })
    }

    /// Pay out `caller`'s whole deposit balance in a finalized round.
    ///
    /// # Errors
    /// Every error of [`settle::withdraw`], `ReentrantCall`, and
    /// `TransferFailure` if the payee refuses the funds.
    pub fn withdraw_deposits(&mut self, round_id: RoundId, caller: ParticipantId) -> Result<Amount> {
        self.guarded("withdraw_deposits", |this, guard| {
            let now = this.clock.now();
            let before = this.store.snapshot(round_id)?;
            let mut staged = before.clone();
            let amount = settle::withdraw(&mut staged, caller, now)?;
            this.conservation.verify_pending(
                round_id,
                staged.bids.total_deposits()?,
                Decimal::ZERO,
                amount,
            )?;
            this.store.restore(staged)?;

            this.transfer_or_rollback(before, |this| {
                let mut callbacks = GuardedCallbacks {
                    coordinator: this.id,
                    guard,
                };
                this.funds.send(caller, amount, &mut callbacks)
            })?;

            this.conservation.record_outflow(round_id, amount)?;
            tracing::info!(round = %round_id, participant = %caller.short(), %amount, "deposit withdrawn");
            this.events.push(AuctionEvent::DepositWithdrawn {
                round: round_id,
                participant: caller,
                amount,
            });
            Ok(amount)
        })
    }

    // =====================================================================
    // Queries
    // =====================================================================

    #[must_use]
    pub fn active_round(&self) -> Option<RoundId> {
        self.state.store.active_id()
    }

    /// Phase of `round_id` at the current clock reading.
    ///
    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn phase(&self, round_id: RoundId) -> Result<RoundPhase> {
        let round = self.round(round_id)?;
        Ok(classify(self.state.clock.now(), round))
    }

    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn outcome(&self, round_id: RoundId) -> Result<RoundOutcome> {
        self.round(round_id).map(RoundOutcome::from)
    }

    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn timestamps(&self, round_id: RoundId) -> Result<RoundTimeline> {
        let round = self.round(round_id)?;
        Ok(RoundTimeline {
            start_time: round.start_time,
            commit_end: round.commit_end,
            reveal_end: round.reveal_end,
            settle_deadline: round.settle_deadline,
        })
    }

    /// A participant's bid record (empty if they never committed).
    ///
    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn bid(&self, round_id: RoundId, participant: ParticipantId) -> Result<BidRecord> {
        Ok(self.state.store.get(round_id)?.bids.get(participant))
    }

    /// # Errors
    /// Returns `RoundNotFound` for unknown ids.
    pub fn round(&self, round_id: RoundId) -> Result<&Round> {
        Ok(&self.state.store.get(round_id)?.round)
    }

    /// Every round ever opened, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Round> {
        self.state.store.history().map(|entry| &entry.round)
    }

    /// Take all published events.
    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        std::mem::take(&mut self.state.events)
    }

    #[must_use]
    pub fn id(&self) -> ParticipantId {
        self.state.id
    }

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        &self.state.config
    }

    #[must_use]
    pub fn conservation(&self) -> &FundsConservation {
        &self.state.conservation
    }

    /// Whether a guarded operation is currently executing.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.state.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.state.registry
    }

    #[must_use]
    pub fn funds(&self) -> &F {
        &self.state.funds
    }

    pub fn funds_mut(&mut self) -> &mut F {
        &mut self.state.funds
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Run `body` holding the reentrancy guard. The guard is released
    /// however `body` exits, unwinding included.
    fn guarded<T>(
        &mut self,
        operation: &'static str,
        body: impl FnOnce(&mut CoordinatorState<R, F, C>, &ReentrancyGuard) -> Result<T>,
    ) -> Result<T> {
        let hold = self.guard.hold(operation)?;
        body(&mut self.state, hold.guard())
    }
}

impl<R: AssetRegistry, F: FundsGateway, C: Clock> CoordinatorState<R, F, C> {
    /// Run an external transfer; on failure put `before` back.
    fn transfer_or_rollback(
        &mut self,
        before: RoundEntry,
        transfer: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if let Err(err) = transfer(self) {
            tracing::warn!(round = %before.round.id, error = %err, "transfer failed, rolling back");
            self.store.restore(before)?;
            return Err(err);
        }
        Ok(())
    }

    fn move_asset(
        &mut self,
        guard: &ReentrancyGuard,
        from: ParticipantId,
        to: ParticipantId,
        asset_id: AssetId,
    ) -> Result<()> {
        let mut callbacks = GuardedCallbacks {
            coordinator: self.id,
            guard,
        };
        self.registry
            .transfer(self.id, from, to, asset_id, &mut callbacks)
    }
}
