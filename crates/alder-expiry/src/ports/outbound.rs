//! Outbound (driven) ports for the expiry subsystem.
//!
//! These traits define the collaborators the engine drives while
//! processing a cycle: fee pricing and usage estimation, the synthetic
//! record stream, and step-wise treasury return.

use shared_types::{CoinAdjustment, ConsensusTime, EntityNum, LedgerEntity, TokenAdjustment};

use crate::domain::AdmissionThrottle;

// =============================================================================
// FEES
// =============================================================================

/// Active fixed fee and per-resource-byte-hour service price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePrices {
    /// Flat component charged by every renewal, in base units.
    pub fixed_fee: u64,
    /// Price of one resource-byte-hour, in base units.
    pub price_per_rb_hour: u64,
}

/// Two-tier price sequence with a switch-over instant.
///
/// Renewals priced at an instant before `switch_at` use `pre`, all others
/// use `post`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSequence {
    /// Prices in force before the switch-over.
    pub pre: ServicePrices,
    /// The switch-over instant.
    pub switch_at: ConsensusTime,
    /// Prices in force from the switch-over on.
    pub post: ServicePrices,
}

impl PriceSequence {
    /// The prices in force at `at`.
    pub fn active_at(&self, at: ConsensusTime) -> ServicePrices {
        if at < self.switch_at {
            self.pre
        } else {
            self.post
        }
    }
}

/// Fee pricing and resource-usage estimation collaborator.
pub trait FeeSource {
    /// The two-tier price sequence for auto-renewals.
    fn price_sequence(&self) -> PriceSequence;

    /// Estimated resource-byte-hour rate of the entity, derived from its
    /// stored resource inputs (key size, memo, proxy, associations).
    fn rb_usage(&self, entity: &LedgerEntity) -> u64;
}

// =============================================================================
// RECORDS
// =============================================================================

/// A network-generated record documenting one renewal or removal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRecord {
    /// The entity the action targeted.
    pub entity: EntityNum,
    /// Human-readable description of the action.
    pub memo: String,
    /// Consensus-assigned event time.
    pub event_time: ConsensusTime,
    /// Base-denomination balance changes (fee debit and funding credit).
    pub coin_adjustments: Vec<CoinAdjustment>,
    /// Token and NFT unit changes performed in this call.
    pub token_adjustments: Vec<TokenAdjustment>,
    /// The entity's new expiry, for renewals.
    pub new_expiry: Option<u64>,
    /// Fee charged, in base units.
    pub fee: u64,
}

/// Destination of synthetic records, with a per-second slot budget.
///
/// Each renewal/removal call emits exactly one record; the per-transaction
/// record budget is finite and shared, so the driver asks before working.
pub trait RecordSink {
    /// True if a record slot is still available in `now`'s consensus second.
    fn has_capacity(&self, now: ConsensusTime) -> bool;

    /// Accepts one synthetic record.
    fn publish(&mut self, record: SyntheticRecord);
}

// =============================================================================
// TREASURY RETURN
// =============================================================================

/// Outcome of one throttle-bounded treasury-return call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasuryStep {
    /// True once the entity holds no more returnable treasury assets.
    pub finished: bool,
    /// Token adjustments performed by this call.
    pub adjustments: Vec<TokenAdjustment>,
}

/// Step-wise redistribution of token balances held by a treasury account.
///
/// An account acting as a token's treasury cannot be deleted until its
/// held balances are returned; the work is bounded by the throttle and may
/// span multiple rounds.
pub trait TreasuryReturner {
    /// True if the entity is a treasury for tokens with outstanding supply.
    fn is_treasury(&self, num: EntityNum) -> bool;

    /// Returns as many held units as the throttle allows.
    fn return_step(&mut self, num: EntityNum, throttle: &mut AdmissionThrottle) -> TreasuryStep;
}
