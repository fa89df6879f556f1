//! Reentrancy guard for custody-transferring operations.
//!
//! External transfers can call back into the coordinator (a contract-like
//! recipient acknowledging an asset, or a payee receiving funds). While one
//! guarded operation is executing, any nested attempt to start another is
//! rejected with [`SealbidError::ReentrantCall`].
//!
//! The guard is paired with the rule that every ledger mutation is written
//! before the external call, so even a callback that slipped past the guard
//! would observe the already-updated balances.

use sealbid_types::{Result, SealbidError};

/// Busy flag held for the duration of one guarded operation.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    /// Name of the operation currently holding the guard.
    holder: Option<&'static str>,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self { holder: None }
    }

    /// Take the guard for `operation`.
    ///
    /// # Errors
    /// Returns [`SealbidError::ReentrantCall`] if the guard is already held.
    pub fn enter(&mut self, operation: &'static str) -> Result<()> {
        self.check(operation)?;
        self.holder = Some(operation);
        Ok(())
    }

    /// Release the guard.
    pub fn exit(&mut self) {
        self.holder = None;
    }

    /// Take the guard for `operation` until the returned [`GuardHold`] is
    /// dropped.
    ///
    /// # Errors
    /// Returns [`SealbidError::ReentrantCall`] if the guard is already held.
    pub fn hold(&mut self, operation: &'static str) -> Result<GuardHold<'_>> {
        self.enter(operation)?;
        Ok(GuardHold { guard: self })
    }

    /// Fail if the guard is held, without taking it.
    ///
    /// # Errors
    /// Returns [`SealbidError::ReentrantCall`] naming the rejected `operation`.
    pub fn check(&self, operation: &'static str) -> Result<()> {
        match self.holder {
            Some(holder) => {
                tracing::warn!(operation, holder, "reentrant call rejected");
                Err(SealbidError::ReentrantCall { operation })
            }
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.holder.is_some()
    }

    /// The operation currently holding the guard.
    #[must_use]
    pub fn holder(&self) -> Option<&'static str> {
        self.holder
    }
}

/// Releases its [`ReentrancyGuard`] on drop, on every exit path of the
/// guarded operation.
#[derive(Debug)]
pub struct GuardHold<'a> {
    guard: &'a mut ReentrancyGuard,
}

impl GuardHold<'_> {
    /// The held guard, for callbacks that must see it busy.
    #[must_use]
    pub fn guard(&self) -> &ReentrancyGuard {
        self.guard
    }
}

impl Drop for GuardHold<'_> {
    fn drop(&mut self) {
        self.guard.exit();
    }
}
