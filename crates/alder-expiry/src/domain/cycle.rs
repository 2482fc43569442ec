//! # Cycle Driver
//!
//! Runs the entity-lifecycle sweep once per consensus transaction: advances
//! a wrapping cursor over the entity-number space under per-second scan and
//! touch budgets, classifies each visited id, and delegates to the renewal
//! or removal engine. Scan progress is durable and identical across
//! replicas at the same consensus time.
//!
//! The driver never fails: absence of capacity, configuration, or entities
//! yields an early return with no mutation.

use shared_types::{ConsensusTime, EntityNum};

use super::classify::classify;
use super::entities::{Classification, EntityProcessResult, ExpiryConfig};
use super::removal::{try_remove_account, try_remove_contract};
use super::renewal::renew_entity;
use super::throttle::{work, AdmissionThrottle};
use crate::ports::{FeeSource, LedgerStore, RecordSink, TreasuryReturner};

/// The lifecycle sweep invoked by consensus-transaction handling.
pub trait LifecycleSweep {
    /// Runs one sweep cycle at the given consensus time.
    ///
    /// Called exactly once per user consensus transaction.
    fn execute(&mut self, now: ConsensusTime);
}

/// Null-object sweep used when no entity kind is configured for
/// auto-renewal or removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSweep;

impl LifecycleSweep for NoopSweep {
    fn execute(&mut self, _now: ConsensusTime) {}
}

/// Lifetime counters of a sweep process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepStats {
    /// Cycles executed.
    pub cycles_run: u64,
    /// Entity ids visited.
    pub entities_scanned: u64,
    /// Entities renewed to a later expiry.
    pub entities_renewed: u64,
    /// Entities fully removed.
    pub entities_removed: u64,
}

/// The expiry engine: scan driver plus its collaborators.
#[derive(Debug)]
pub struct ExpiryEngine<S, F, R, T> {
    config: ExpiryConfig,
    store: S,
    fees: F,
    records: R,
    treasury: T,
    throttle: AdmissionThrottle,
    stats: SweepStats,
}

impl<S, F, R, T> ExpiryEngine<S, F, R, T>
where
    S: LedgerStore,
    F: FeeSource,
    R: RecordSink,
    T: TreasuryReturner,
{
    /// Creates an engine over the given collaborators.
    pub fn new(config: ExpiryConfig, store: S, fees: F, records: R, treasury: T) -> Self {
        let throttle = AdmissionThrottle::new(config.work_units_per_transaction);
        Self {
            config,
            store,
            fees,
            records,
            treasury,
            throttle,
            stats: SweepStats::default(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ExpiryConfig {
        &self.config
    }

    /// Read access to the working state, for inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the working state, for seeding.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Read access to the record sink, for inspection.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Mutable access to the record sink, for retention purging.
    pub fn records_mut(&mut self) -> &mut R {
        &mut self.records
    }

    /// Lifetime sweep counters.
    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Cyclic successor of `from` within `[first, wrap)`.
    fn advance(from: EntityNum, first: EntityNum, wrap: EntityNum) -> EntityNum {
        let next = from.wrapping_add(1);
        if next < first || next >= wrap {
            first
        } else {
            next
        }
    }

    /// Classifies and processes one entity id.
    fn process(&mut self, num: EntityNum, now: ConsensusTime) -> EntityProcessResult {
        if !self.records.has_capacity(now) {
            return EntityProcessResult::NoCapacityLeft;
        }
        let classification = classify(&self.store, &self.config, &mut self.throttle, num, now);
        let result = match classification {
            Classification::Other => EntityProcessResult::NothingToDo,
            Classification::ComeBackLater => EntityProcessResult::StillMoreToDo,
            Classification::AccountReadyToRenew | Classification::ContractReadyToRenew => {
                renew_entity(
                    &mut self.store,
                    &self.fees,
                    &mut self.records,
                    &self.config,
                    num,
                    now,
                )
            }
            Classification::AccountGracePeriodOver => try_remove_account(
                &mut self.store,
                &mut self.records,
                &mut self.treasury,
                &mut self.throttle,
                num,
                now,
            ),
            Classification::ContractGracePeriodOver => try_remove_contract(
                &mut self.store,
                &mut self.records,
                &mut self.treasury,
                &mut self.throttle,
                num,
                now,
            ),
        };
        if result == EntityProcessResult::Done {
            match classification {
                Classification::AccountReadyToRenew | Classification::ContractReadyToRenew => {
                    self.stats.entities_renewed += 1;
                }
                Classification::AccountGracePeriodOver
                | Classification::ContractGracePeriodOver => {
                    self.stats.entities_removed += 1;
                }
                _ => {}
            }
        }
        result
    }
}

impl<S, F, R, T> LifecycleSweep for ExpiryEngine<S, F, R, T>
where
    S: LedgerStore,
    F: FeeSource,
    R: RecordSink,
    T: TreasuryReturner,
{
    fn execute(&mut self, now: ConsensusTime) {
        if !self.config.any_kind_enabled() {
            return;
        }
        let wrap = self.store.wrap_bound();
        if wrap <= self.config.first_scannable {
            return;
        }
        if !self.records.has_capacity(now) {
            return;
        }

        let mut progress = self.store.progress();
        if progress.second != now.seconds {
            // First transaction of a new consensus second.
            progress.second = now.seconds;
            progress.scanned_this_second = 0;
            progress.touched_this_second = 0;
        }
        self.throttle.reset(self.config.work_units_per_transaction);

        let mut current = progress.last_scanned;
        let mut retry = progress.retry_pending;
        while progress.scanned_this_second < self.config.max_scanned_per_second
            && progress.touched_this_second < self.config.max_touched_per_second
            && self.throttle.remaining() >= work::CLASSIFY
            && self.records.has_capacity(now)
        {
            if !retry {
                current = Self::advance(current, self.config.first_scannable, wrap);
            }
            progress.scanned_this_second += 1;
            self.stats.entities_scanned += 1;

            let result = self.process(current, now);
            retry = false;
            match result {
                EntityProcessResult::NothingToDo => {}
                EntityProcessResult::Done => {
                    progress.touched_this_second += 1;
                }
                EntityProcessResult::StillMoreToDo => {
                    progress.touched_this_second += 1;
                    retry = true;
                }
                EntityProcessResult::NoCapacityLeft => {
                    retry = true;
                    break;
                }
            }
        }

        progress.last_scanned = current;
        progress.retry_pending = retry;
        progress.throttle_units_used = self.throttle.used();
        self.store.put_progress(progress);
        self.stats.cycles_run += 1;

        tracing::debug!(
            second = now.seconds,
            cursor = progress.last_scanned,
            scanned = progress.scanned_this_second,
            touched = progress.touched_this_second,
            work_units = progress.throttle_units_used,
            "expiry cycle complete"
        );
    }
}

/// Builds the sweep selected by configuration: the real engine when any
/// entity kind participates, the null object otherwise.
///
/// # Errors
///
/// Returns [`crate::domain::ExpiryError::InvalidConfig`] for budgets the
/// driver cannot run under.
pub fn lifecycle_sweep<S, F, R, T>(
    config: ExpiryConfig,
    store: S,
    fees: F,
    records: R,
    treasury: T,
) -> Result<Box<dyn LifecycleSweep>, crate::domain::ExpiryError>
where
    S: LedgerStore + 'static,
    F: FeeSource + 'static,
    R: RecordSink + 'static,
    T: TreasuryReturner + 'static,
{
    config.validate()?;
    if config.any_kind_enabled() {
        Ok(Box::new(ExpiryEngine::new(
            config, store, fees, records, treasury,
        )))
    } else {
        Ok(Box::new(NoopSweep))
    }
}
