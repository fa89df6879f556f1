//! End-to-end tests across all three planes.
//!
//! These drive the [`AuctionCoordinator`] through complete rounds:
//! start → commit → reveal → finalize → pay / reclaim / withdraw
//!
//! They cover the four reference scenarios, tie-break determinism, funds
//! conservation, re-entrant callbacks from transfer recipients, rollback
//! when an external transfer is refused, and amounts at the edge of the
//! representable range.

use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use rust_decimal::Decimal;
use sealbid_engine::compute_commitment;
use sealbid_settlement::{
    AssetRegistry, AuctionCoordinator, ForwardToCoordinator, GuardedCall, InMemoryFunds, InMemoryRegistry,
    PayeeHook, RecipientHook, TransferCallbacks,
};
use sealbid_types::constants::ASSET_RECEIVED_ACK;
use sealbid_types::*;

type Coordinator = AuctionCoordinator<InMemoryRegistry, InMemoryFunds, ManualClock>;

const T0: u64 = 1_704_067_200;
const ASSET: AssetId = AssetId(1);

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

struct Bidder {
    id: ParticipantId,
    amount: Decimal,
    salt: Salt,
}

/// One coordinator with a round open at `T0`: commit ends at `T0 + 100`,
/// reveal at `T0 + 200`, and the winner gets 100 seconds to pay.
struct Auction {
    coord: Coordinator,
    clock: ManualClock,
    seller: ParticipantId,
    round: RoundId,
}

impl Auction {
    fn open(reserve: i64) -> Self {
        Self::open_with(AuctionConfig::default(), reserve)
    }

    fn open_with(config: AuctionConfig, reserve: i64) -> Self {
        let me = ParticipantId::new();
        let seller = ParticipantId::new();
        let mut registry = InMemoryRegistry::new();
        registry.mint(ASSET, seller).unwrap();
        registry.set_approval_for_all(seller, me, true);
        registry.register_contract(me, Box::new(ForwardToCoordinator));

        let clock = ManualClock::new(T0);
        let mut coord =
            AuctionCoordinator::new(me, config, registry, InMemoryFunds::new(), clock.clone())
                .unwrap();
        let round = coord
            .start_auction(seller, ASSET, dec(reserve), 100, 100, 100)
            .unwrap();
        Self {
            coord,
            clock,
            seller,
            round,
        }
    }

    fn commit(&mut self, amount: i64) -> Bidder {
        self.commit_amount(dec(amount))
    }

    fn commit_amount(&mut self, amount: Decimal) -> Bidder {
        let bidder = Bidder {
            id: ParticipantId::new(),
            amount,
            salt: Salt::random(),
        };
        let deposit = self.coord.round(self.round).unwrap().deposit_price;
        let hash = compute_commitment(bidder.amount, &bidder.salt);
        self.coord.commit_bid(bidder.id, hash, deposit).unwrap();
        bidder
    }

    fn reveal(&mut self, bidder: &Bidder) -> Result<sealbid_engine::RankOutcome> {
        self.coord.reveal_bid(bidder.id, bidder.amount, &bidder.salt)
    }

    fn to_reveal(&self) {
        self.clock.set(T0 + 100);
    }

    fn to_finalize(&self) {
        self.clock.set(T0 + 200);
    }

    fn deposit(&self, who: ParticipantId) -> Decimal {
        self.coord.bid(self.round, who).unwrap().deposit_balance
    }

    fn owner(&self) -> Option<ParticipantId> {
        self.coord.registry().owner_of(ASSET)
    }

    /// Auction with X bidding 150 and Y 120 against a reserve of 100,
    /// finalized at the end of the reveal window.
    fn scenario_a() -> (Self, Bidder, Bidder) {
        let mut a = Self::open(100);
        let x = a.commit(150);
        let y = a.commit(120);
        a.to_reveal();
        a.reveal(&x).unwrap();
        a.reveal(&y).unwrap();
        a.to_finalize();
        a.coord.finalize().unwrap();
        (a, x, y)
    }
}

/// Records what a nested call attempt returned.
type CallLog = Rc<RefCell<Vec<Result<()>>>>;

/// Contract-like winner that tries to claim again while receiving the asset.
struct ReentrantRecipient {
    round: RoundId,
    me: ParticipantId,
    log: CallLog,
}

impl RecipientHook for ReentrantRecipient {
    fn on_received(
        &mut self,
        callbacks: &mut dyn TransferCallbacks,
        _operator: ParticipantId,
        _from: ParticipantId,
        _asset_id: AssetId,
    ) -> [u8; 4] {
        let again = GuardedCall::PayAndClaim {
            round: self.round,
            caller: self.me,
            payment: Decimal::ZERO,
        };
        self.log.borrow_mut().push(callbacks.reenter(again));
        ASSET_RECEIVED_ACK
    }
}

/// Contract-like account whose receipt hook crashes.
struct PanickingRecipient;

impl RecipientHook for PanickingRecipient {
    fn on_received(
        &mut self,
        _callbacks: &mut dyn TransferCallbacks,
        _operator: ParticipantId,
        _from: ParticipantId,
        _asset_id: AssetId,
    ) -> [u8; 4] {
        panic!("receipt hook crashed");
    }
}

/// Contract-like account that never acknowledges.
struct Unacknowledging;

impl RecipientHook for Unacknowledging {
    fn on_received(
        &mut self,
        _callbacks: &mut dyn TransferCallbacks,
        _operator: ParticipantId,
        _from: ParticipantId,
        _asset_id: AssetId,
    ) -> [u8; 4] {
        [0xde, 0xad, 0xbe, 0xef]
    }
}

/// Payee that tries to withdraw again while being paid.
struct ReentrantPayee {
    round: RoundId,
    me: ParticipantId,
    log: CallLog,
}

impl PayeeHook for ReentrantPayee {
    fn on_payment(&mut self, callbacks: &mut dyn TransferCallbacks, _amount: Decimal) -> bool {
        let again = GuardedCall::WithdrawDeposits {
            round: self.round,
            caller: self.me,
        };
        self.log.borrow_mut().push(callbacks.reenter(again));
        true
    }
}

/// Payee whose acceptance can be switched from the test.
struct Switchable {
    accept: Rc<Cell<bool>>,
}

impl PayeeHook for Switchable {
    fn on_payment(&mut self, _callbacks: &mut dyn TransferCallbacks, _amount: Decimal) -> bool {
        self.accept.get()
    }
}

// =========================================================================
// Reference scenarios
// =========================================================================

#[test]
fn scenario_a_second_price_with_deposit_offset() {
    let (mut a, x, y) = Auction::scenario_a();
    let round = a.coord.round(a.round).unwrap().clone();

    assert_eq!(round.highest_bidder, Some(x.id));
    assert_eq!(round.highest_bid, dec(150));
    assert_eq!(round.second_bid, dec(120));
    assert_eq!(round.clearing_price, dec(70));
    assert_eq!(round.settle_deadline, Some(Timestamp(T0 + 300)));
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::AwaitPayment);
    assert_eq!(a.deposit(x.id), Decimal::ZERO);
    assert_eq!(a.deposit(a.seller), dec(50));

    a.clock.set(T0 + 250);
    a.coord.pay_and_claim(a.round, x.id, dec(70)).unwrap();

    assert_eq!(a.owner(), Some(x.id));
    assert_eq!(a.deposit(a.seller), dec(120));
    let outcome = a.coord.outcome(a.round).unwrap();
    assert_eq!(outcome.winner, Some(x.id));
    assert_eq!(outcome.clearing_price, Decimal::ZERO);
    assert!(a.coord.round(a.round).unwrap().settled);
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Ended);

    // Everyone cashes out.
    assert_eq!(a.coord.withdraw_deposits(a.round, a.seller).unwrap(), dec(120));
    assert_eq!(a.coord.withdraw_deposits(a.round, y.id).unwrap(), dec(50));
    assert_eq!(a.coord.funds().received_by(a.seller), dec(120));
    assert_eq!(a.coord.funds().received_by(y.id), dec(50));
    assert_eq!(a.coord.conservation().expected_balance(a.round), Decimal::ZERO);

    assert_eq!(
        a.coord.pay_and_claim(a.round, x.id, Decimal::ZERO).unwrap_err(),
        SealbidError::NothingToClaim
    );
}

#[test]
fn scenario_a_event_stream() {
    let (mut a, x, _y) = Auction::scenario_a();
    let events = a.coord.drain_events();
    let kinds: Vec<_> = events.iter().map(AuctionEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "ROUND_STARTED",
            "BID_COMMITTED",
            "BID_COMMITTED",
            "BID_REVEALED",
            "BID_REVEALED",
            "FINALIZED"
        ]
    );
    assert_eq!(
        events.last(),
        Some(&AuctionEvent::Finalized {
            round: a.round,
            winner: Some(x.id),
            highest_bid: dec(150),
            second_bid: dec(120),
            clearing_price: dec(70),
        })
    );
    assert!(events.iter().all(|e| e.round() == a.round));
}

#[test]
fn scenario_b_no_valid_reveal_returns_asset() {
    let mut a = Auction::open(100);
    let low = a.commit(90);
    let silent = a.commit(500);
    a.to_reveal();
    let err = a.reveal(&low).unwrap_err();
    assert!(matches!(err, SealbidError::InvalidRevealedPrice { .. }));
    a.to_finalize();

    let outcome = a.coord.finalize().unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.clearing_price, Decimal::ZERO);
    assert_eq!(outcome.settle_deadline, None);
    assert!(a.coord.round(a.round).unwrap().settled);
    assert_eq!(a.owner(), Some(a.seller));
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Ended);

    // Deposits stay withdrawable one by one.
    assert_eq!(a.coord.withdraw_deposits(a.round, low.id).unwrap(), dec(50));
    assert_eq!(a.coord.withdraw_deposits(a.round, silent.id).unwrap(), dec(50));
    assert_eq!(
        a.coord.withdraw_deposits(a.round, a.seller).unwrap_err(),
        SealbidError::NoDeposit
    );
}

#[test]
fn scenario_c_over_collateralized_winner() {
    // Deposit at twice the reserve: reserve 40 -> deposit 80.
    let config = AuctionConfig {
        deposit_ratio: dec(2),
        ..AuctionConfig::default()
    };
    let mut a = Auction::open_with(config, 40);
    assert_eq!(a.coord.round(a.round).unwrap().deposit_price, dec(80));
    let w = a.commit(90);
    let l = a.commit(60);
    a.to_reveal();
    a.reveal(&w).unwrap();
    a.reveal(&l).unwrap();
    a.to_finalize();

    let outcome = a.coord.finalize().unwrap();
    assert_eq!(outcome.winner, Some(w.id));
    assert_eq!(outcome.clearing_price, Decimal::ZERO);
    assert_eq!(a.deposit(w.id), dec(20));
    assert_eq!(a.deposit(a.seller), dec(60));

    // Seller cannot take back an asset that is already paid for.
    a.clock.set(T0 + 10_000);
    assert_eq!(
        a.coord.seller_reclaim(a.round, a.seller).unwrap_err(),
        SealbidError::WinnerPaidInFull(a.round)
    );
    assert_eq!(
        a.coord.pay_and_claim(a.round, w.id, dec(1)).unwrap_err(),
        SealbidError::PaymentMismatch {
            required: Decimal::ZERO,
            attached: dec(1)
        }
    );

    // Surplus is withdrawable before the claim, and the claim has no deadline.
    assert_eq!(a.coord.withdraw_deposits(a.round, w.id).unwrap(), dec(20));
    a.coord.pay_and_claim(a.round, w.id, Decimal::ZERO).unwrap();
    assert_eq!(a.owner(), Some(w.id));
    assert_eq!(a.coord.withdraw_deposits(a.round, l.id).unwrap(), dec(80));
    assert_eq!(a.coord.withdraw_deposits(a.round, a.seller).unwrap(), dec(60));
}

#[test]
fn scenario_d_seller_reclaims_after_deadline() {
    let (mut a, x, y) = Auction::scenario_a();

    a.clock.set(T0 + 300);
    assert!(matches!(
        a.coord.seller_reclaim(a.round, a.seller).unwrap_err(),
        SealbidError::PhaseViolation {
            phase: RoundPhase::AwaitPayment,
            ..
        }
    ));

    a.clock.set(T0 + 301);
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Ended);
    assert_eq!(
        a.coord.pay_and_claim(a.round, x.id, dec(70)).unwrap_err(),
        SealbidError::DeadlineExceeded {
            deadline: Timestamp(T0 + 300),
            now: Timestamp(T0 + 301)
        }
    );
    assert!(matches!(
        a.coord.seller_reclaim(a.round, y.id).unwrap_err(),
        SealbidError::Unauthorized { .. }
    ));

    a.coord.seller_reclaim(a.round, a.seller).unwrap();
    assert_eq!(a.owner(), Some(a.seller));
    assert_eq!(a.deposit(x.id), Decimal::ZERO);
    assert_eq!(a.deposit(a.seller), dec(50));
    assert!(a.coord.round(a.round).unwrap().settled);

    assert_eq!(
        a.coord.seller_reclaim(a.round, a.seller).unwrap_err(),
        SealbidError::AlreadySettled(a.round)
    );
    assert_eq!(
        a.coord.pay_and_claim(a.round, x.id, dec(70)).unwrap_err(),
        SealbidError::NothingToClaim
    );
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn tie_break_favors_earlier_commit_regardless_of_reveal_order() {
    for early_reveals_first in [true, false] {
        let mut a = Auction::open(100);
        let early = a.commit(130);
        let late = a.commit(130);
        a.to_reveal();
        if early_reveals_first {
            a.reveal(&early).unwrap();
            a.reveal(&late).unwrap();
        } else {
            a.reveal(&late).unwrap();
            a.reveal(&early).unwrap();
        }

        let round = a.coord.round(a.round).unwrap();
        assert_eq!(round.highest_bidder, Some(early.id));
        assert_eq!(round.highest_bid, dec(130));
        assert_eq!(round.second_bid, dec(130));
        assert!(
            a.coord.bid(a.round, early.id).unwrap().commit_sequence
                < a.coord.bid(a.round, late.id).unwrap().commit_sequence
        );
    }
}

#[test]
fn commitment_round_trip() {
    let mut a = Auction::open(100);
    let x = a.commit(150);
    a.to_reveal();

    let err = a.coord.reveal_bid(x.id, dec(149), &x.salt).unwrap_err();
    assert_eq!(err, SealbidError::CommitmentMismatch);
    let err = a.coord.reveal_bid(x.id, x.amount, &Salt::random()).unwrap_err();
    assert_eq!(err, SealbidError::CommitmentMismatch);

    a.reveal(&x).unwrap();
    let rec = a.coord.bid(a.round, x.id).unwrap();
    assert_eq!(rec.revealed_amount, Some(dec(150)));
    assert_eq!(rec.commitment, Some(compute_commitment(x.amount, &x.salt)));
    assert_eq!(a.reveal(&x).unwrap_err(), SealbidError::RevealAlreadyDone);
}

#[test]
fn finalize_conserves_collected_deposits() {
    let mut a = Auction::open(100);
    let bidders: Vec<Bidder> = [150, 120, 101, 80].into_iter().map(|n| a.commit(n)).collect();
    let collected = dec(50) * Decimal::from(bidders.len());
    a.to_reveal();
    for b in &bidders {
        let _ = a.reveal(b);
    }
    a.to_finalize();
    a.coord.finalize().unwrap();

    let total: Decimal = bidders
        .iter()
        .map(|b| a.deposit(b.id))
        .chain([a.deposit(a.seller)])
        .sum();
    assert_eq!(total, collected);
    assert_eq!(a.coord.conservation().expected_balance(a.round), collected);

    let round = a.coord.round(a.round).unwrap();
    let deal = round.clearing_price + dec(50);
    assert!(round.reserve_price <= deal && deal <= round.highest_bid);
    assert!(round.second_bid <= round.highest_bid);
}

#[test]
fn finalize_is_once_only() {
    let (mut a, _x, _y) = Auction::scenario_a();
    assert_eq!(
        a.coord.finalize().unwrap_err(),
        SealbidError::AlreadyFinalized(a.round)
    );
}

#[test]
fn phases_follow_the_clock() {
    let mut a = Auction::open(100);
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Commit);
    let x = a.commit(150);
    a.clock.set(T0 + 99);
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Commit);
    a.to_reveal();
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::Reveal);
    assert!(matches!(
        a.coord.finalize().unwrap_err(),
        SealbidError::PhaseViolation {
            phase: RoundPhase::Reveal,
            ..
        }
    ));
    a.reveal(&x).unwrap();
    a.to_finalize();
    assert_eq!(a.coord.phase(a.round).unwrap(), RoundPhase::FinalizePending);
    // Commits after the window are refused.
    let err = a
        .coord
        .commit_bid(ParticipantId::new(), Commitment([7; 32]), dec(50))
        .unwrap_err();
    assert!(matches!(err, SealbidError::PhaseViolation { .. }));

    let timeline = a.coord.timestamps(a.round).unwrap();
    assert_eq!(timeline.start_time, Timestamp(T0));
    assert_eq!(timeline.reveal_end, Timestamp(T0 + 200));
    assert_eq!(timeline.settle_deadline, None);
}

// =========================================================================
// Re-entrancy
// =========================================================================

#[test]
fn reentrant_withdraw_from_payee_hook_is_rejected() {
    let (mut a, _x, y) = Auction::scenario_a();
    let log = CallLog::default();
    let hook = ReentrantPayee {
        round: a.round,
        me: y.id,
        log: Rc::clone(&log),
    };
    a.coord.funds_mut().register_payee(y.id, Box::new(hook));

    assert_eq!(a.coord.withdraw_deposits(a.round, y.id).unwrap(), dec(50));

    assert_eq!(
        *log.borrow(),
        vec![Err(SealbidError::ReentrantCall {
            operation: "withdraw_deposits"
        })]
    );
    assert_eq!(a.coord.funds().received_by(y.id), dec(50));
    assert_eq!(a.deposit(y.id), Decimal::ZERO);
    assert_eq!(
        a.coord.withdraw_deposits(a.round, y.id).unwrap_err(),
        SealbidError::NoDeposit
    );
}

#[test]
fn reentrant_claim_from_recipient_hook_is_rejected() {
    let (mut a, x, _y) = Auction::scenario_a();
    let log = CallLog::default();
    let hook = ReentrantRecipient {
        round: a.round,
        me: x.id,
        log: Rc::clone(&log),
    };
    a.coord.registry_mut().register_contract(x.id, Box::new(hook));

    a.clock.set(T0 + 250);
    a.coord.pay_and_claim(a.round, x.id, dec(70)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![Err(SealbidError::ReentrantCall {
            operation: "pay_and_claim"
        })]
    );
    assert_eq!(a.owner(), Some(x.id));
    assert_eq!(a.deposit(a.seller), dec(120));
}

// =========================================================================
// Rollback on refused transfers
// =========================================================================

#[test]
fn refused_asset_transfer_leaves_round_unsettled() {
    let (mut a, x, _y) = Auction::scenario_a();
    a.coord
        .registry_mut()
        .register_contract(x.id, Box::new(Unacknowledging));
    a.coord.drain_events();
    let me = a.coord.id();

    a.clock.set(T0 + 250);
    let err = a.coord.pay_and_claim(a.round, x.id, dec(70)).unwrap_err();
    assert!(matches!(err, SealbidError::TransferFailure { .. }));

    let round = a.coord.round(a.round).unwrap();
    assert!(!round.settled);
    assert_eq!(round.clearing_price, dec(70));
    assert_eq!(a.deposit(a.seller), dec(50));
    assert_eq!(a.owner(), Some(me));
    assert_eq!(a.coord.conservation().expected_balance(a.round), dec(100));
    assert!(a.coord.drain_events().is_empty());

    // The guard was released: the seller can still reclaim later.
    a.clock.set(T0 + 301);
    a.coord.seller_reclaim(a.round, a.seller).unwrap();
    assert_eq!(a.owner(), Some(a.seller));
}

#[test]
fn refused_payout_keeps_balance() {
    let (mut a, _x, y) = Auction::scenario_a();
    let accept = Rc::new(Cell::new(false));
    let hook = Switchable {
        accept: Rc::clone(&accept),
    };
    a.coord.funds_mut().register_payee(y.id, Box::new(hook));

    let err = a.coord.withdraw_deposits(a.round, y.id).unwrap_err();
    assert!(matches!(err, SealbidError::TransferFailure { .. }));
    assert_eq!(a.deposit(y.id), dec(50));
    assert_eq!(a.coord.funds().received_by(y.id), Decimal::ZERO);

    accept.set(true);
    assert_eq!(a.coord.withdraw_deposits(a.round, y.id).unwrap(), dec(50));
    assert_eq!(a.coord.funds().total_sent(), dec(50));
}

#[test]
fn refused_escrow_opens_nothing() {
    let me = ParticipantId::new();
    let seller = ParticipantId::new();
    let mut registry = InMemoryRegistry::new();
    registry.mint(ASSET, seller).unwrap();
    registry.set_approval_for_all(seller, me, true);
    // The coordinator's account acknowledges nothing.
    registry.register_contract(me, Box::new(Unacknowledging));

    let mut coord = AuctionCoordinator::new(
        me,
        AuctionConfig::default(),
        registry,
        InMemoryFunds::new(),
        ManualClock::new(T0),
    )
    .unwrap();
    let err = coord
        .start_auction(seller, ASSET, dec(100), 100, 100, 100)
        .unwrap_err();
    assert!(matches!(err, SealbidError::TransferFailure { .. }));
    assert!(coord.active_round().is_none());
    assert_eq!(coord.registry().owner_of(ASSET), Some(seller));
}

#[test]
fn panicking_hook_releases_guard() {
    let me = ParticipantId::new();
    let seller = ParticipantId::new();
    let mut registry = InMemoryRegistry::new();
    registry.mint(ASSET, seller).unwrap();
    registry.mint(AssetId(2), seller).unwrap();
    registry.set_approval_for_all(seller, me, true);
    registry.register_contract(me, Box::new(PanickingRecipient));
    let mut coord: Coordinator = AuctionCoordinator::new(
        me,
        AuctionConfig::default(),
        registry,
        InMemoryFunds::new(),
        ManualClock::new(T0),
    )
    .unwrap();

    let crashed = catch_unwind(AssertUnwindSafe(|| {
        coord.start_auction(seller, ASSET, dec(100), 100, 100, 100)
    }));
    assert!(crashed.is_err());
    assert!(!coord.is_busy());
    assert!(coord.active_round().is_none());

    coord
        .registry_mut()
        .register_contract(me, Box::new(ForwardToCoordinator));
    let round = coord
        .start_auction(seller, AssetId(2), dec(100), 100, 100, 100)
        .unwrap();
    assert_eq!(round, RoundId(1));
}

// =========================================================================
// Extreme amounts
// =========================================================================

#[test]
fn maximal_bids_fail_payment_without_side_effects() {
    let mut a = Auction::open(100);
    let x = a.commit_amount(Decimal::MAX);
    let y = a.commit_amount(Decimal::MAX);
    a.to_reveal();
    a.reveal(&x).unwrap();
    a.reveal(&y).unwrap();
    a.to_finalize();

    let outcome = a.coord.finalize().unwrap();
    assert_eq!(outcome.winner, Some(x.id));
    let owed = Decimal::MAX - dec(50);
    assert_eq!(outcome.clearing_price, owed);
    a.coord.drain_events();

    // The seller's proceeds plus the loser's deposit are not representable.
    let err = a.coord.pay_and_claim(a.round, x.id, owed).unwrap_err();
    assert!(matches!(err, SealbidError::AmountOverflow { .. }));
    let round = a.coord.round(a.round).unwrap();
    assert!(!round.settled);
    assert_eq!(round.clearing_price, owed);
    assert_eq!(a.deposit(a.seller), dec(50));
    assert_eq!(a.owner(), Some(a.coord.id()));
    assert!(a.coord.drain_events().is_empty());
    assert!(!a.coord.is_busy());

    // The round still closes through the remaining paths.
    assert_eq!(a.coord.withdraw_deposits(a.round, y.id).unwrap(), dec(50));
    a.clock.set(T0 + 301);
    assert_eq!(
        a.coord.seller_reclaim(a.round, a.seller).unwrap(),
        Decimal::ZERO
    );
    assert_eq!(a.owner(), Some(a.seller));
    assert_eq!(a.coord.withdraw_deposits(a.round, a.seller).unwrap(), dec(50));
    assert_eq!(a.coord.conservation().expected_balance(a.round), Decimal::ZERO);
}

#[test]
fn overflowing_deposit_price_opens_nothing() {
    let me = ParticipantId::new();
    let seller = ParticipantId::new();
    let mut registry = InMemoryRegistry::new();
    registry.mint(ASSET, seller).unwrap();
    registry.set_approval_for_all(seller, me, true);
    registry.register_contract(me, Box::new(ForwardToCoordinator));
    let config = AuctionConfig {
        deposit_ratio: Decimal::TWO,
        ..AuctionConfig::default()
    };
    let mut coord: Coordinator =
        AuctionCoordinator::new(me, config, registry, InMemoryFunds::new(), ManualClock::new(T0))
            .unwrap();

    let err = coord
        .start_auction(seller, ASSET, Decimal::MAX, 100, 100, 100)
        .unwrap_err();
    assert_eq!(
        err,
        SealbidError::InvalidReservePrice {
            reserve: Decimal::MAX
        }
    );
    assert!(coord.active_round().is_none());
    assert!(!coord.is_busy());
    assert_eq!(coord.registry().owner_of(ASSET), Some(seller));
    assert!(coord.drain_events().is_empty());
}

// =========================================================================
// Round history
// =========================================================================

#[test]
fn next_round_after_settlement_and_late_withdrawal() {
    let (mut a, x, y) = Auction::scenario_a();
    let first = a.round;
    a.coord.registry_mut().mint(AssetId(2), a.seller).unwrap();

    let err = a
        .coord
        .start_auction(a.seller, AssetId(2), dec(100), 100, 100, 100)
        .unwrap_err();
    assert_eq!(err, SealbidError::RoundInProgress(first));

    a.coord.pay_and_claim(first, x.id, dec(70)).unwrap();
    let second = a
        .coord
        .start_auction(a.seller, AssetId(2), dec(100), 100, 100, 100)
        .unwrap();
    assert_eq!(second, RoundId(2));
    assert_eq!(a.coord.active_round(), Some(second));

    // Round 1 stays queryable and its deposits withdrawable.
    assert!(a.coord.round(first).unwrap().settled);
    assert_eq!(a.coord.withdraw_deposits(first, y.id).unwrap(), dec(50));
    let ids: Vec<RoundId> = a.coord.history().map(|r| r.id).collect();
    assert_eq!(ids, vec![first, second]);

    // New commits go to the new round.
    a.round = second;
    let z = a.commit(200);
    assert_eq!(a.coord.bid(second, z.id).unwrap().commit_sequence, 1);
    assert_eq!(a.coord.bid(first, z.id).unwrap(), BidRecord::default());
}
