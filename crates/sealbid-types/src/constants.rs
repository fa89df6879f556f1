//! System-wide constants for the SealBid coordinator.

/// Default deposit as a fraction of the reserve price, in percent (50 = half).
pub const DEFAULT_DEPOSIT_RATIO_PCT: i64 = 50;

/// Default cap on the per-commit deposit, in whole currency units.
pub const DEFAULT_MAX_DEPOSIT: i64 = 1_000;

/// Shortest accepted commit / reveal / settle window, in seconds.
pub const DEFAULT_MIN_PHASE_SECS: u64 = 1;

/// Longest accepted commit / reveal / settle window (30 days), in seconds.
pub const DEFAULT_MAX_PHASE_SECS: u64 = 30 * 24 * 60 * 60;

/// Domain tag prefixed to every commitment preimage.
pub const COMMITMENT_DOMAIN: &[u8] = b"sealbid:commitment:v1:";

/// Value a contract-like recipient returns to acknowledge an asset transfer.
pub const ASSET_RECEIVED_ACK: [u8; 4] = [0x15, 0x0b, 0x7a, 0x02];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SealBid";
