//! External collaborators the coordinator depends on.
//!
//! The coordinator never owns the traded asset's registry or the payment
//! rail. It talks to them through [`AssetRegistry`] and [`FundsGateway`],
//! and hands each transfer a [`TransferCallbacks`] handle so that the
//! recipient side can acknowledge receipt or try to call back in.

use sealbid_types::{Amount, AssetId, ParticipantId, Result, RoundId};

/// A coordinator operation that runs under the reentrancy guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedCall {
    PayAndClaim {
        round: RoundId,
        caller: ParticipantId,
        payment: Amount,
    },
    SellerReclaim {
        round: RoundId,
        caller: ParticipantId,
    },
    WithdrawDeposits {
        round: RoundId,
        caller: ParticipantId,
    },
}

impl GuardedCall {
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::PayAndClaim { .. } => "pay_and_claim",
            Self::SellerReclaim { .. } => "seller_reclaim",
            Self::WithdrawDeposits { .. } => "withdraw_deposits",
        }
    }
}

/// Handle into the coordinator, passed down to transfer recipients.
pub trait TransferCallbacks {
    /// Receipt acknowledgement for an asset sent to the coordinator.
    ///
    /// Returns [`ASSET_RECEIVED_ACK`](sealbid_types::constants::ASSET_RECEIVED_ACK)
    /// when the coordinator accepts custody.
    fn on_asset_received(
        &mut self,
        operator: ParticipantId,
        from: ParticipantId,
        asset_id: AssetId,
    ) -> [u8; 4];

    /// Attempt to start another guarded operation from inside a transfer.
    ///
    /// The coordinator never runs `call`. Its handle exists only while a
    /// guarded operation holds the guard, so every nested call is refused;
    /// a recipient that wants to act again must wait for the outer call to
    /// return and call the coordinator directly.
    ///
    /// # Errors
    /// Returns `ReentrantCall` naming `call`'s operation while a guarded
    /// operation is executing.
    fn reenter(&mut self, call: GuardedCall) -> Result<()>;
}

/// Ownership registry for the traded asset.
pub trait AssetRegistry {
    /// Current owner, or `None` for an unknown asset.
    fn owner_of(&self, asset_id: AssetId) -> Option<ParticipantId>;

    fn is_approved_for_all(&self, owner: ParticipantId, operator: ParticipantId) -> bool;

    fn get_approved(&self, asset_id: AssetId) -> Option<ParticipantId>;

    /// Atomically move `asset_id` from `from` to `to` on behalf of `operator`.
    ///
    /// Contract-like recipients are asked to acknowledge through
    /// `callbacks`; a missing acknowledgement fails the whole transfer.
    ///
    /// # Errors
    /// Returns `TransferFailure` if the transfer is refused.
    fn transfer(
        &mut self,
        operator: ParticipantId,
        from: ParticipantId,
        to: ParticipantId,
        asset_id: AssetId,
        callbacks: &mut dyn TransferCallbacks,
    ) -> Result<()>;
}

/// Outbound payment rail for deposit withdrawals.
pub trait FundsGateway {
    /// Send `amount` from the coordinator to `to`.
    ///
    /// # Errors
    /// Returns `TransferFailure` if the payee refuses the funds.
    fn send(
        &mut self,
        to: ParticipantId,
        amount: Amount,
        callbacks: &mut dyn TransferCallbacks,
    ) -> Result<()>;
}
