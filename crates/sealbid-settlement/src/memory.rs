//! In-memory collaborators.
//!
//! [`InMemoryRegistry`] keeps owners and approvals in hash maps and calls
//! the [`RecipientHook`] of contract-like recipients after moving an asset.
//! [`InMemoryFunds`] records every payout and lets a [`PayeeHook`] refuse
//! it or call back into the coordinator.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sealbid_types::{
    Amount, AssetId, ParticipantId, Result, SealbidError, constants::ASSET_RECEIVED_ACK,
};

use crate::collaborators::{AssetRegistry, FundsGateway, TransferCallbacks};

/// Receipt hook of a contract-like asset recipient.
pub trait RecipientHook {
    /// Called after the asset moved to this recipient. Anything other than
    /// [`ASSET_RECEIVED_ACK`] reverts the transfer.
    fn on_received(
        &mut self,
        callbacks: &mut dyn TransferCallbacks,
        operator: ParticipantId,
        from: ParticipantId,
        asset_id: AssetId,
    ) -> [u8; 4];
}

/// Hook for the coordinator's own account: defers to the coordinator's
/// [`TransferCallbacks::on_asset_received`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardToCoordinator;

impl RecipientHook for ForwardToCoordinator {
    fn on_received(
        &mut self,
        callbacks: &mut dyn TransferCallbacks,
        operator: ParticipantId,
        from: ParticipantId,
        asset_id: AssetId,
    ) -> [u8; 4] {
        callbacks.on_asset_received(operator, from, asset_id)
    }
}

/// Asset registry held entirely in memory.
#[derive(Default)]
pub struct InMemoryRegistry {
    owners: HashMap<AssetId, ParticipantId>,
    approvals: HashMap<AssetId, ParticipantId>,
    operators: HashSet<(ParticipantId, ParticipantId)>,
    contracts: HashMap<ParticipantId, Box<dyn RecipientHook>>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `asset_id` owned by `owner`.
    ///
    /// # Errors
    /// Returns `Configuration` if the asset already exists.
    pub fn mint(&mut self, asset_id: AssetId, owner: ParticipantId) -> Result<()> {
        if self.owners.contains_key(&asset_id) {
            return Err(SealbidError::Configuration(format!(
                "{asset_id} already minted"
            )));
        }
        self.owners.insert(asset_id, owner);
        Ok(())
    }

    /// Approve `operator` for a single asset. Only the owner may approve.
    ///
    /// # Errors
    /// Returns `NotAssetOwner` if `owner` does not hold the asset.
    pub fn approve(
        &mut self,
        owner: ParticipantId,
        operator: ParticipantId,
        asset_id: AssetId,
    ) -> Result<()> {
        if self.owners.get(&asset_id) != Some(&owner) {
            return Err(SealbidError::NotAssetOwner(asset_id));
        }
        self.approvals.insert(asset_id, operator);
        Ok(())
    }

    pub fn set_approval_for_all(
        &mut self,
        owner: ParticipantId,
        operator: ParticipantId,
        approved: bool,
    ) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    /// Mark `account` as contract-like, with `hook` answering receipts.
    pub fn register_contract(&mut self, account: ParticipantId, hook: Box<dyn RecipientHook>) {
        self.contracts.insert(account, hook);
    }

    fn may_move(&self, operator: ParticipantId, owner: ParticipantId, asset_id: AssetId) -> bool {
        operator == owner
            || self.approvals.get(&asset_id) == Some(&operator)
            || self.operators.contains(&(owner, operator))
    }
}

impl AssetRegistry for InMemoryRegistry {
    fn owner_of(&self, asset_id: AssetId) -> Option<ParticipantId> {
        self.owners.get(&asset_id).copied()
    }

    fn is_approved_for_all(&self, owner: ParticipantId, operator: ParticipantId) -> bool {
        self.operators.contains(&(owner, operator))
    }

    fn get_approved(&self, asset_id: AssetId) -> Option<ParticipantId> {
        self.approvals.get(&asset_id).copied()
    }

    fn transfer(
        &mut self,
        operator: ParticipantId,
        from: ParticipantId,
        to: ParticipantId,
        asset_id: AssetId,
        callbacks: &mut dyn TransferCallbacks,
    ) -> Result<()> {
        if self.owners.get(&asset_id) != Some(&from) {
            return Err(SealbidError::TransferFailure {
                reason: format!("{asset_id} is not owned by {}", from.short()),
            });
        }
        if !self.may_move(operator, from, asset_id) {
            return Err(SealbidError::TransferFailure {
                reason: format!("{} may not move {asset_id}", operator.short()),
            });
        }

        let prior_approval = self.approvals.remove(&asset_id);
        self.owners.insert(asset_id, to);

        if let Some(hook) = self.contracts.get_mut(&to) {
            let ack = hook.on_received(callbacks, operator, from, asset_id);
            if ack != ASSET_RECEIVED_ACK {
                self.owners.insert(asset_id, from);
                if let Some(approved) = prior_approval {
                    self.approvals.insert(asset_id, approved);
                }
                tracing::warn!(%asset_id, to = %to.short(), "recipient did not acknowledge");
                return Err(SealbidError::TransferFailure {
                    reason: format!("{} did not acknowledge {asset_id}", to.short()),
                });
            }
        }
        Ok(())
    }
}

/// Receive hook of a payee on the funds rail.
pub trait PayeeHook {
    /// Called before the funds land. Returning `false` refuses them.
    fn on_payment(&mut self, callbacks: &mut dyn TransferCallbacks, amount: Amount) -> bool;
}

/// Payment rail that records payouts in memory.
#[derive(Default)]
pub struct InMemoryFunds {
    received: HashMap<ParticipantId, Amount>,
    payees: HashMap<ParticipantId, Box<dyn PayeeHook>>,
}

impl InMemoryFunds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_payee(&mut self, account: ParticipantId, hook: Box<dyn PayeeHook>) {
        self.payees.insert(account, hook);
    }

    /// Total paid out to `account` so far.
    #[must_use]
    pub fn received_by(&self, account: ParticipantId) -> Amount {
        self.received.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of every payout, saturating at the largest amount.
    #[must_use]
    pub fn total_sent(&self) -> Amount {
        self.received
            .values()
            .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount))
    }
}

impl FundsGateway for InMemoryFunds {
    fn send(
        &mut self,
        to: ParticipantId,
        amount: Amount,
        callbacks: &mut dyn TransferCallbacks,
    ) -> Result<()> {
        let received = self
            .received_by(to)
            .checked_add(amount)
            .ok_or_else(|| SealbidError::TransferFailure {
                reason: format!("{} balance overflow", to.short()),
            })?;
        let accepted = self
            .payees
            .get_mut(&to)
            .is_none_or(|hook| hook.on_payment(callbacks, amount));
        if !accepted {
            tracing::warn!(payee = %to.short(), %amount, "payment refused");
            return Err(SealbidError::TransferFailure {
                reason: format!("{} refused {amount}", to.short()),
            });
        }
        self.received.insert(to, received);
        Ok(())
    }
}
