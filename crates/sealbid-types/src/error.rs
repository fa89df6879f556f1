//! Error types for the SealBid coordinator.
//!
//! All errors use the `SB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by family:
//! - 1xx: Configuration / input errors
//! - 2xx: Phase and round-lifecycle errors
//! - 3xx: Authorization errors
//! - 4xx: Commitment / reveal errors
//! - 5xx: Payment and settlement errors
//! - 6xx: External transfer and reentrancy errors
//! - 9xx: General / internal errors
//!
//! Every coordinator operation is all-or-nothing: when one of these is
//! returned, no state change from that call is visible.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AssetId, ParticipantId, RoundId, RoundPhase, Timestamp};

/// Central error enum for all SealBid operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealbidError {
    // =================================================================
    // Configuration Errors (1xx)
    // =================================================================
    /// Invalid coordinator configuration.
    #[error("SB_ERR_100: Configuration error: {0}")]
    Configuration(String),

    /// Reserve price must be strictly positive.
    #[error("SB_ERR_101: Invalid reserve price: {reserve}")]
    InvalidReservePrice { reserve: Decimal },

    /// A phase duration is outside the configured bounds.
    #[error("SB_ERR_102: Invalid {phase} duration: {secs}s")]
    InvalidDuration { phase: &'static str, secs: u64 },

    /// The all-zero hash cannot be committed.
    #[error("SB_ERR_103: Commitment must be non-zero")]
    InvalidCommitment,

    // =================================================================
    // Phase / Round Errors (2xx)
    // =================================================================
    /// An operation was attempted outside its valid time window.
    #[error("SB_ERR_200: {operation} not allowed in phase {phase}")]
    PhaseViolation {
        operation: &'static str,
        phase: RoundPhase,
    },

    /// No round with this id exists.
    #[error("SB_ERR_201: Round not found: {0}")]
    RoundNotFound(RoundId),

    /// No round has been started yet.
    #[error("SB_ERR_202: No active round")]
    NoActiveRound,

    /// A new round was requested while the current one is unsettled.
    #[error("SB_ERR_203: Round in progress: {0}")]
    RoundInProgress(RoundId),

    /// The round is part of history, not the active round.
    #[error("SB_ERR_204: Round is not the active round: {0}")]
    RoundNotActive(RoundId),

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The caller is not permitted to perform this operation.
    #[error("SB_ERR_300: {caller} not authorized to {operation}")]
    Unauthorized {
        operation: &'static str,
        caller: ParticipantId,
    },

    /// The caller does not own the asset it tried to auction.
    #[error("SB_ERR_301: Caller does not own {0}")]
    NotAssetOwner(AssetId),

    /// The coordinator is not approved to take custody of the asset.
    #[error("SB_ERR_302: Custody transfer not approved for {0}")]
    CustodyNotApproved(AssetId),

    // =================================================================
    // Commitment / Reveal Errors (4xx)
    // =================================================================
    /// The revealed (amount, salt) does not reproduce the commitment.
    #[error("SB_ERR_400: Reveal does not match commitment")]
    CommitmentMismatch,

    /// The participant has no live commitment in this round.
    #[error("SB_ERR_401: No commitment for participant")]
    NoCommitment,

    /// The participant has already revealed in this round.
    #[error("SB_ERR_402: Reveal already done")]
    RevealAlreadyDone,

    /// The revealed amount is below the reserve price.
    #[error("SB_ERR_403: Revealed price {amount} below reserve {reserve}")]
    InvalidRevealedPrice { amount: Decimal, reserve: Decimal },

    // =================================================================
    // Payment / Settlement Errors (5xx)
    // =================================================================
    /// The attached payment differs from the exact required amount.
    #[error("SB_ERR_500: Payment mismatch: required {required}, attached {attached}")]
    PaymentMismatch { required: Decimal, attached: Decimal },

    /// `finalize` was already executed for this round.
    #[error("SB_ERR_501: Round already finalized: {0}")]
    AlreadyFinalized(RoundId),

    /// The round already reached its terminal settled state.
    #[error("SB_ERR_502: Round already settled: {0}")]
    AlreadySettled(RoundId),

    /// Payment arrived after the settle deadline while still owing.
    #[error("SB_ERR_503: Settle deadline {deadline} exceeded at {now}")]
    DeadlineExceeded { deadline: Timestamp, now: Timestamp },

    /// Nothing left to claim for this round.
    #[error("SB_ERR_504: Nothing to claim")]
    NothingToClaim,

    /// The caller has no deposit balance in this round.
    #[error("SB_ERR_505: No deposit to withdraw")]
    NoDeposit,

    /// Funds conservation invariant violated. Critical safety alert.
    #[error("SB_ERR_506: Funds invariant violation: {reason}")]
    FundsInvariantViolation { reason: String },

    /// The winner owes nothing, so the asset stays reserved for them.
    #[error("SB_ERR_507: Winner paid in full, asset reserved in {0}")]
    WinnerPaidInFull(RoundId),

    /// A balance or flow total would exceed the representable range.
    #[error("SB_ERR_508: Amount overflow in {context}")]
    AmountOverflow { context: &'static str },

    // =================================================================
    // Transfer / Reentrancy Errors (6xx)
    // =================================================================
    /// The external asset or fund transfer was refused.
    #[error("SB_ERR_600: Transfer failed: {reason}")]
    TransferFailure { reason: String },

    /// A guarded operation was invoked while another one is executing.
    #[error("SB_ERR_601: Reentrant call rejected: {operation}")]
    ReentrantCall { operation: &'static str },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SB_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealbidError>;
