//! # Consensus Time
//!
//! The network-agreed timestamp assigned to each consensus transaction.
//! All expiry and retention logic is driven by this value, never by the
//! node's wall clock, so that every replica processing the same consensus
//! history makes identical decisions.

use serde::{Deserialize, Serialize};

/// A consensus-assigned instant with second/nanosecond resolution.
///
/// Field order matters: the derived `Ord` compares `seconds` before
/// `nanos`, which is exactly chronological order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ConsensusTime {
    /// Whole seconds since the epoch.
    pub seconds: u64,
    /// Sub-second nanoseconds, always `< 1_000_000_000`.
    pub nanos: u32,
}

impl ConsensusTime {
    /// Creates a consensus time from seconds and nanoseconds.
    pub const fn new(seconds: u64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a consensus time on an exact second boundary.
    pub const fn from_secs(seconds: u64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Returns this instant shifted forward by whole seconds.
    pub const fn plus_secs(self, secs: u64) -> Self {
        Self {
            seconds: self.seconds + secs,
            nanos: self.nanos,
        }
    }

    /// True if both instants fall within the same consensus second.
    ///
    /// Per-second budgets (entities scanned, record slots) reset exactly
    /// when this stops holding between consecutive transactions.
    pub const fn same_second_as(self, other: Self) -> bool {
        self.seconds == other.seconds
    }
}

impl std::fmt::Display for ConsensusTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}
