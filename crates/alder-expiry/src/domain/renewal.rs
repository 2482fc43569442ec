//! # Renewal Calculator and Engine
//!
//! Computes the longest renewal an expired entity can afford from its
//! balance and resource-usage rate, then applies it: extend the expiry,
//! debit the fee, credit the funding account, emit one synthetic record.
//!
//! All arithmetic is non-negative integer math with guarded divisions; a
//! zero balance or zero usage rate yields a defined result, never a fault.

use shared_types::{CoinAdjustment, ConsensusTime, EntityNum, LedgerEntity};

use super::entities::{EntityProcessResult, ExpiryConfig};
use crate::ports::{FeeSource, LedgerStore, PriceSequence, RecordSink, SyntheticRecord};

const SECS_PER_HOUR: u64 = 3600;

/// The renewal an entity can afford: a duration and its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalQuote {
    /// Granted renewal duration in seconds; zero means no renewal.
    pub renewed_period_secs: u64,
    /// Fee to charge, in base units; never exceeds the entity's balance.
    pub fee: u64,
}

impl RenewalQuote {
    const NONE: Self = Self {
        renewed_period_secs: 0,
        fee: 0,
    };
}

/// Quotes the longest affordable renewal for `entity`, up to
/// `requested_period_secs`, priced at `at`.
///
/// A zero balance quotes `(0, 0)`. Otherwise at least one resource-byte-hour
/// is granted, and the fee is clamped to the balance.
pub fn max_renewal_and_fee(
    entity: &LedgerEntity,
    requested_period_secs: u64,
    at: ConsensusTime,
    prices: &PriceSequence,
    rb_usage: u64,
) -> RenewalQuote {
    if entity.balance == 0 {
        return RenewalQuote::NONE;
    }

    let active = prices.active_at(at);
    let remaining_balance = entity.balance.saturating_sub(active.fixed_fee);
    let fee_per_hour = active.price_per_rb_hour.saturating_mul(rb_usage);
    let affordable_hours = if fee_per_hour == 0 {
        0
    } else {
        remaining_balance / fee_per_hour
    };
    let requested_hours = requested_period_secs / SECS_PER_HOUR;
    let max_renewable_rbh = affordable_hours.min(requested_hours).max(1);

    RenewalQuote {
        renewed_period_secs: max_renewable_rbh * SECS_PER_HOUR,
        fee: active
            .fixed_fee
            .saturating_add(max_renewable_rbh.saturating_mul(active.price_per_rb_hour))
            .min(entity.balance),
    }
}

/// Renews the entity at `num` if it can afford any extension.
///
/// Applies the quote, credits the funding account, and emits one renewal
/// record. A `(0, 0)` quote mutates nothing and reports `NothingToDo`.
pub fn renew_entity<S, F, R>(
    store: &mut S,
    fees: &F,
    records: &mut R,
    config: &ExpiryConfig,
    num: EntityNum,
    now: ConsensusTime,
) -> EntityProcessResult
where
    S: LedgerStore,
    F: FeeSource,
    R: RecordSink,
{
    let Some(mut entity) = store.entity(num) else {
        tracing::warn!(entity = num, "renewal requested for a missing entity");
        return EntityProcessResult::NothingToDo;
    };

    let quote = max_renewal_and_fee(
        &entity,
        entity.auto_renew_period,
        now,
        &fees.price_sequence(),
        fees.rb_usage(&entity),
    );
    if quote.renewed_period_secs == 0 {
        return EntityProcessResult::NothingToDo;
    }

    let new_expiry = entity.expiry.saturating_add(quote.renewed_period_secs);
    entity.expiry = new_expiry;
    entity.balance -= quote.fee;
    store.put_entity(entity);

    credit_funding(store, config.funding_account, quote.fee);

    tracing::debug!(
        entity = num,
        new_expiry,
        fee = quote.fee,
        "entity automatically renewed"
    );
    records.publish(SyntheticRecord {
        entity: num,
        memo: format!("Entity {num} was automatically renewed. New expiration time: {new_expiry}."),
        event_time: now,
        coin_adjustments: vec![
            CoinAdjustment {
                account: num,
                amount: -(quote.fee as i64),
            },
            CoinAdjustment {
                account: config.funding_account,
                amount: quote.fee as i64,
            },
        ],
        token_adjustments: vec![],
        new_expiry: Some(new_expiry),
        fee: quote.fee,
    });

    EntityProcessResult::Done
}

fn credit_funding<S: LedgerStore>(store: &mut S, funding: EntityNum, fee: u64) {
    match store.entity(funding) {
        Some(mut account) => {
            account.balance = account.balance.saturating_add(fee);
            store.put_entity(account);
        }
        None => {
            tracing::warn!(account = funding, "funding account missing; fee burned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FlatFeeSource, InMemoryLedger, RecordBuffer};
    use crate::ports::ServicePrices;

    fn prices(fixed_fee: u64, price: u64) -> PriceSequence {
        PriceSequence {
            pre: ServicePrices {
                fixed_fee,
                price_per_rb_hour: price,
            },
            switch_at: ConsensusTime::from_secs(u64::MAX),
            post: ServicePrices {
                fixed_fee: fixed_fee * 10,
                price_per_rb_hour: price * 10,
            },
        }
    }

    #[test]
    fn test_zero_balance_quotes_nothing() {
        let entity = LedgerEntity::account(1001, 0);
        let quote = max_renewal_and_fee(
            &entity,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(10, 2),
            10,
        );
        assert_eq!(quote, RenewalQuote::NONE);
    }

    #[test]
    fn test_quote_caps_at_requested_period() {
        // 90 days requested = 2160 hours; balance affords far more.
        let entity = LedgerEntity::account(2002, u64::MAX / 2);
        let quote = max_renewal_and_fee(
            &entity,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(10, 2),
            1,
        );
        assert_eq!(quote.renewed_period_secs, 2160 * 3600);
        assert_eq!(quote.fee, 10 + 2160 * 2);
    }

    #[test]
    fn test_quote_caps_at_affordable_hours() {
        // fixed 100, price*usage = 2*10 = 20/hour, balance 500_000.
        // affordable = (500_000 - 100) / 20 = 24_995 hours > requested 2160.
        let entity = LedgerEntity::account(2002, 500_000);
        let quote = max_renewal_and_fee(
            &entity,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(100, 2),
            10,
        );
        assert_eq!(quote.renewed_period_secs, 2160 * 3600);
        assert_eq!(quote.fee, 100 + 2160 * 2);

        // A poor entity is capped by its balance instead.
        let poor = LedgerEntity::account(2003, 141);
        let quote = max_renewal_and_fee(
            &poor,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(100, 2),
            10,
        );
        // (141 - 100) / 20 = 2 affordable hours.
        assert_eq!(quote.renewed_period_secs, 2 * 3600);
        assert_eq!(quote.fee, 100 + 2 * 2);
    }

    #[test]
    fn test_minimum_one_hour_granted_and_fee_clamped() {
        // Balance below the fixed fee: still one hour, fee = whole balance.
        let entity = LedgerEntity::account(2002, 50);
        let quote = max_renewal_and_fee(
            &entity,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(100, 2),
            10,
        );
        assert_eq!(quote.renewed_period_secs, 3600);
        assert_eq!(quote.fee, 50);
    }

    #[test]
    fn test_zero_usage_rate_is_guarded() {
        let entity = LedgerEntity::account(2002, 1000);
        let quote = max_renewal_and_fee(
            &entity,
            7_776_000,
            ConsensusTime::from_secs(0),
            &prices(10, 2),
            0,
        );
        // Zero fee-per-hour: zero affordable hours, lifted to the minimum.
        assert_eq!(quote.renewed_period_secs, 3600);
        assert_eq!(quote.fee, 12);
    }

    #[test]
    fn test_fee_never_exceeds_balance() {
        for balance in [1u64, 50, 141, 10_000, 500_000] {
            let entity = LedgerEntity::account(2002, balance);
            let quote = max_renewal_and_fee(
                &entity,
                7_776_000,
                ConsensusTime::from_secs(0),
                &prices(100, 7),
                13,
            );
            assert!(quote.fee <= balance, "fee {} > balance {}", quote.fee, balance);
        }
    }

    #[test]
    fn test_renew_entity_applies_quote_and_emits_record() {
        let mut store = InMemoryLedger::new();
        let config = ExpiryConfig::default();
        store.put_entity(LedgerEntity::account(config.funding_account, 0));
        store.put_entity(
            LedgerEntity::account(2002, 500_000)
                .with_expiry(1000)
                .with_auto_renew_period(7_776_000),
        );
        let fees = FlatFeeSource::uniform(100, 2);
        let mut records = RecordBuffer::with_defaults();
        let now = ConsensusTime::from_secs(5000);

        let result = renew_entity(&mut store, &fees, &mut records, &config, 2002, now);

        assert_eq!(result, EntityProcessResult::Done);
        let renewed = store.entity(2002).unwrap();
        // Fee is the fixed component plus one service price per granted hour.
        let fee = 100 + 2160 * 2;
        assert_eq!(renewed.expiry, 1000 + 2160 * 3600);
        assert_eq!(renewed.balance, 500_000 - fee);
        assert_eq!(store.entity(config.funding_account).unwrap().balance, fee);

        let published = records.records();
        assert_eq!(published.len(), 1);
        assert!(published[0].memo.contains("automatically renewed"));
        assert_eq!(published[0].new_expiry, Some(renewed.expiry));
        assert_eq!(published[0].fee, fee);
    }

    #[test]
    fn test_renew_entity_with_zero_balance_is_noop() {
        let mut store = InMemoryLedger::new();
        store.put_entity(
            LedgerEntity::account(2002, 0)
                .with_expiry(1000)
                .with_auto_renew_period(7_776_000),
        );
        let fees = FlatFeeSource::uniform(100, 2);
        let mut records = RecordBuffer::with_defaults();

        let result = renew_entity(
            &mut store,
            &fees,
            &mut records,
            &ExpiryConfig::default(),
            2002,
            ConsensusTime::from_secs(5000),
        );

        assert_eq!(result, EntityProcessResult::NothingToDo);
        assert_eq!(store.entity(2002).unwrap().expiry, 1000);
        assert!(records.records().is_empty());
    }
}
