//! # Entity Classification
//!
//! Maps one entity id and one consensus time to a lifecycle disposition.
//! Pure with respect to persistent entity state: the only mutation is the
//! throttle's consumed capacity.
//!
//! ## Decision Order
//!
//! 1. Throttle denies the classification cost → `ComeBackLater`
//! 2. Id is not a live, enabled, in-range entity → `Other`
//! 3. Not yet expired → `Other`
//! 4. Within the grace period → ready-to-renew (account or contract)
//! 5. Grace period lapsed → grace-period-over (ready for removal)

use shared_types::{ConsensusTime, EntityKind, EntityNum};

use super::entities::{Classification, ExpiryConfig};
use super::throttle::{work, AdmissionThrottle};
use crate::ports::LedgerStore;

/// Classifies the entity at `num` as of consensus time `now`.
pub fn classify<S: LedgerStore>(
    store: &S,
    config: &ExpiryConfig,
    throttle: &mut AdmissionThrottle,
    num: EntityNum,
    now: ConsensusTime,
) -> Classification {
    if !throttle.allow(work::CLASSIFY) {
        return Classification::ComeBackLater;
    }
    if num < config.first_scannable || num >= store.wrap_bound() {
        return Classification::Other;
    }
    let Some(entity) = store.entity(num) else {
        return Classification::Other;
    };
    if entity.num != num {
        tracing::warn!(
            requested = num,
            stored = entity.num,
            "entity keyed under a foreign number; skipping"
        );
        return Classification::Other;
    }
    if entity.deleted || !config.kind_enabled(entity.kind) {
        return Classification::Other;
    }
    if entity.expiry > now.seconds {
        return Classification::Other;
    }
    let renewable_until = entity.expiry.saturating_add(config.grace_period_secs);
    if now.seconds <= renewable_until {
        match entity.kind {
            EntityKind::Account => Classification::AccountReadyToRenew,
            EntityKind::Contract => Classification::ContractReadyToRenew,
        }
    } else {
        match entity.kind {
            EntityKind::Account => Classification::AccountGracePeriodOver,
            EntityKind::Contract => Classification::ContractGracePeriodOver,
        }
    }
}
