//! Clock authority abstraction.
//!
//! Every phase boundary is derived from a single timestamp read once per
//! coordinator call, so all checks inside one call agree on "now".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds on the clock authority's scale (Unix seconds in production).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Add a duration in seconds, returning `None` on overflow.
    #[must_use]
    pub fn checked_add_secs(self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// Add a duration in seconds, clamping at `u64::MAX`.
    #[must_use]
    pub fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Render as a UTC datetime, if representable.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "t+{}", self.0),
        }
    }
}

/// Source of the current time.
///
/// Must be monotonically non-decreasing across calls.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system's UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-helpers"))]
mod manual {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::{Clock, Timestamp};

    /// Hand-driven clock for tests. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        current: Arc<AtomicU64>,
    }

    impl ManualClock {
        #[must_use]
        pub fn new(initial: u64) -> Self {
            Self {
                current: Arc::new(AtomicU64::new(initial)),
            }
        }

        pub fn set(&self, secs: u64) {
            self.current.store(secs, Ordering::SeqCst);
        }

        pub fn advance(&self, secs: u64) {
            self.current.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new(1_704_067_200) // 2024-01-01 00:00:00 UTC
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            Timestamp(self.current.load(Ordering::SeqCst))
        }
    }
}
