//! # Domain Entities for the Expiry Subsystem
//!
//! Core value types: the lifecycle disposition of an entity, the outcome of
//! processing one id in one round, the durable scan checkpoint, and the
//! subsystem configuration.

use serde::{Deserialize, Serialize};
use shared_types::{EntityKind, EntityNum};

use super::errors::ExpiryError;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Lifecycle disposition of one entity id at one consensus time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a live, enabled, expired entity; nothing to do for this id.
    Other,
    /// The admission throttle denied the classification cost; retry the
    /// same id in a later round.
    ComeBackLater,
    /// An expired account still inside its grace period.
    AccountReadyToRenew,
    /// An expired contract still inside its grace period.
    ContractReadyToRenew,
    /// An account whose grace period has lapsed; ready for removal.
    AccountGracePeriodOver,
    /// A contract whose grace period has lapsed; ready for removal.
    ContractGracePeriodOver,
}

/// Outcome of processing one entity id in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityProcessResult {
    /// The id required no work.
    NothingToDo,
    /// Work was started but not finished; the same id is retried next round.
    StillMoreToDo,
    /// The id's renewal or removal completed in this round.
    Done,
    /// No record slot or work capacity was left; the round must stop.
    NoCapacityLeft,
}

// =============================================================================
// EXPIRY EVENTS
// =============================================================================

/// An (id, expiry) pair tracked by the expiry queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryEvent<K> {
    /// The tracked id.
    pub id: K,
    /// Expiry, in seconds since the epoch.
    pub expiry: u64,
}

impl<K> ExpiryEvent<K> {
    /// Creates an expiry event.
    pub const fn new(id: K, expiry: u64) -> Self {
        Self { id, expiry }
    }
}

// =============================================================================
// DURABLE SCAN CHECKPOINT
// =============================================================================

/// Durable progress of the entity scan.
///
/// Read at cycle start, written at cycle end, and identical across replicas
/// at the same consensus time. Must round-trip exactly across a restart;
/// every field is consensus-derived, never wall-clock-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanProgress {
    /// The consensus second the per-second counters belong to.
    pub second: u64,
    /// The last entity number the scan visited.
    pub last_scanned: EntityNum,
    /// True if `last_scanned` returned `StillMoreToDo` and must be
    /// revisited before the cursor advances.
    pub retry_pending: bool,
    /// Entities scanned during `second`.
    pub scanned_this_second: u32,
    /// Entities renewed or removed during `second`.
    pub touched_this_second: u32,
    /// Throttle work units consumed by the most recent cycle.
    pub throttle_units_used: u64,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration for the expiry subsystem.
///
/// Injected policy: which entity kinds participate, the grace period, and
/// the per-round budgets are all properties of the network, not constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryConfig {
    /// Auto-renew/remove expired accounts.
    pub expire_accounts: bool,
    /// Auto-renew/remove expired contracts.
    pub expire_contracts: bool,
    /// Window after expiry during which an entity remains renewable, in
    /// seconds.
    pub grace_period_secs: u64,
    /// First entity number the scan may visit; everything below is a
    /// reserved system entity.
    pub first_scannable: EntityNum,
    /// Maximum entities scanned per consensus second.
    pub max_scanned_per_second: u32,
    /// Maximum entities renewed or removed per consensus second.
    pub max_touched_per_second: u32,
    /// Throttle work units available to each consensus transaction.
    pub work_units_per_transaction: u64,
    /// Account credited with renewal fees.
    pub funding_account: EntityNum,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            expire_accounts: true,
            expire_contracts: true,
            grace_period_secs: 604_800, // 7 days
            first_scannable: 1001,
            max_scanned_per_second: 100,
            max_touched_per_second: 20,
            work_units_per_transaction: 100,
            funding_account: 98,
        }
    }
}

impl ExpiryConfig {
    /// True if at least one entity kind participates in auto-expiry.
    pub fn any_kind_enabled(&self) -> bool {
        self.expire_accounts || self.expire_contracts
    }

    /// True if the given kind participates in auto-expiry.
    pub fn kind_enabled(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Account => self.expire_accounts,
            EntityKind::Contract => self.expire_contracts,
        }
    }

    /// Rejects configurations the cycle driver cannot run under.
    pub fn validate(&self) -> Result<(), ExpiryError> {
        if self.max_scanned_per_second == 0 {
            return Err(ExpiryError::InvalidConfig {
                reason: "max_scanned_per_second must be positive".to_string(),
            });
        }
        if self.max_touched_per_second > self.max_scanned_per_second {
            return Err(ExpiryError::InvalidConfig {
                reason: "touch budget cannot exceed scan budget".to_string(),
            });
        }
        if self.work_units_per_transaction == 0 {
            return Err(ExpiryError::InvalidConfig {
                reason: "work_units_per_transaction must be positive".to_string(),
            });
        }
        Ok(())
    }
}
