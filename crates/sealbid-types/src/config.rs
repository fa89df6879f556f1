//! Coordinator configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Amount, Result, SealbidError, constants};

/// Tunables applied when a seller opens a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Deposit as a fraction of the reserve price (0.5 = half).
    pub deposit_ratio: Decimal,
    /// Upper bound on the per-commit deposit.
    pub max_deposit: Amount,
    /// Shortest accepted commit / reveal / settle window, in seconds.
    pub min_phase_secs: u64,
    /// Longest accepted commit / reveal / settle window, in seconds.
    pub max_phase_secs: u64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            deposit_ratio: Decimal::new(constants::DEFAULT_DEPOSIT_RATIO_PCT, 2),
            max_deposit: Decimal::new(constants::DEFAULT_MAX_DEPOSIT, 0),
            min_phase_secs: constants::DEFAULT_MIN_PHASE_SECS,
            max_phase_secs: constants::DEFAULT_MAX_PHASE_SECS,
        }
    }
}

impl AuctionConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns [`SealbidError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.deposit_ratio <= Decimal::ZERO {
            return Err(SealbidError::Configuration(format!(
                "deposit_ratio must be positive, got {}",
                self.deposit_ratio
            )));
        }
        if self.max_deposit <= Decimal::ZERO {
            return Err(SealbidError::Configuration(format!(
                "max_deposit must be positive, got {}",
                self.max_deposit
            )));
        }
        if self.min_phase_secs == 0 {
            return Err(SealbidError::Configuration(
                "min_phase_secs must be at least 1".to_string(),
            ));
        }
        if self.min_phase_secs > self.max_phase_secs {
            return Err(SealbidError::Configuration(format!(
                "min_phase_secs {} exceeds max_phase_secs {}",
                self.min_phase_secs, self.max_phase_secs
            )));
        }
        Ok(())
    }

    /// Deposit every commit in a round with this reserve must attach:
    /// `min(reserve × deposit_ratio, max_deposit)`.
    ///
    /// # Errors
    /// Returns [`SealbidError::InvalidReservePrice`] if the product overflows.
    pub fn deposit_for(&self, reserve_price: Amount) -> Result<Amount> {
        let deposit = reserve_price
            .checked_mul(self.deposit_ratio)
            .ok_or(SealbidError::InvalidReservePrice {
                reserve: reserve_price,
            })?;
        Ok(deposit.min(self.max_deposit).normalize())
    }

    /// Check one phase window against the configured bounds.
    ///
    /// # Errors
    /// Returns [`SealbidError::InvalidDuration`] if out of bounds.
    pub fn check_window(&self, phase: &'static str, secs: u64) -> Result<()> {
        if secs < self.min_phase_secs || secs > self.max_phase_secs {
            return Err(SealbidError::InvalidDuration { phase, secs });
        }
        Ok(())
    }
}
