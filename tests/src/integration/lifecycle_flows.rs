//! # Whole-Subsystem Lifecycle Flows
//!
//! Drives the expiry engine the way consensus-transaction handling does:
//! one `execute` per transaction, consensus time only ever moving forward,
//! and asserts on the durable checkpoint, the working state, and the
//! synthetic records that each flow leaves behind.

use alder_expiry::{
    decode_progress, encode_progress, work, ExpiryConfig, ExpiryEngine, FeeSource, FlatFeeSource,
    InMemoryLedger, LedgerStore, LifecycleSweep, NoTreasuryReturns, PriceSequence, RecordBuffer,
    ServicePrices,
};
use shared_types::{ConsensusTime, LedgerEntity, RelKey};

/// Fee source with a fixed resource-usage rate, so renewal arithmetic can
/// be asserted in closed form.
struct StubFees {
    prices: ServicePrices,
    usage: u64,
}

impl FeeSource for StubFees {
    fn price_sequence(&self) -> PriceSequence {
        PriceSequence {
            pre: self.prices,
            switch_at: ConsensusTime::from_secs(0),
            post: self.prices,
        }
    }

    fn rb_usage(&self, _entity: &LedgerEntity) -> u64 {
        self.usage
    }
}

fn removal_config() -> ExpiryConfig {
    ExpiryConfig {
        grace_period_secs: 1000,
        max_scanned_per_second: 1000,
        max_touched_per_second: 100,
        work_units_per_transaction: 10_000,
        ..Default::default()
    }
}

#[test]
fn expired_account_past_grace_is_unlinked_and_deleted() {
    let mut store = InMemoryLedger::new();
    store.put_entity(LedgerEntity::account(1001, 0).with_expiry(100));
    store.link_token_rels(1001, &[(7001, 12)]);

    let mut engine = ExpiryEngine::new(
        removal_config(),
        store,
        FlatFeeSource::uniform(10, 1),
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );

    // Far beyond expiry + grace: classification is grace-period-over.
    engine.execute(ConsensusTime::from_secs(10_000));

    assert!(engine.store().entity(1001).is_none());
    assert_eq!(engine.store().token_rel_count(), 0);
    assert_eq!(engine.stats().entities_removed, 1);

    let records = engine.records().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entity, 1001);
    assert!(records[0].memo.contains("automatically deleted"));
    assert_eq!(records[0].token_adjustments.len(), 1);
    assert_eq!(records[0].token_adjustments[0].amount, -12);
}

#[test]
fn renewal_extends_expiry_and_charges_closed_form_fee() {
    const BALANCE: u64 = 500_000;
    const FIXED: u64 = 100;
    const PRICE: u64 = 5;
    const USAGE: u64 = 10;
    const OLD_EXPIRY: u64 = 50_000;

    let config = ExpiryConfig {
        grace_period_secs: 1_000_000,
        first_scannable: 2000,
        ..removal_config()
    };
    let mut store = InMemoryLedger::new();
    store.put_entity(LedgerEntity::account(config.funding_account, 0));
    store.put_entity(
        LedgerEntity::account(2002, BALANCE)
            .with_expiry(OLD_EXPIRY)
            .with_auto_renew_period(7_776_000), // 90 days = 2160 hours
    );

    let mut engine = ExpiryEngine::new(
        config,
        store,
        StubFees {
            prices: ServicePrices {
                fixed_fee: FIXED,
                price_per_rb_hour: PRICE,
            },
            usage: USAGE,
        },
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );

    // Inside the grace window: classification is ready-to-renew.
    engine.execute(ConsensusTime::from_secs(OLD_EXPIRY + 10));

    // affordable = (500_000 - 100) / (5 * 10) = 9_998 hours, requested 2_160.
    let granted_hours = 2_160u64;
    let fee = FIXED + granted_hours * PRICE;
    let renewed = engine.store().entity(2002).unwrap();
    assert_eq!(renewed.expiry, OLD_EXPIRY + granted_hours * 3600);
    assert_eq!(renewed.balance, BALANCE - fee);
    assert_eq!(
        engine
            .store()
            .entity(engine.config().funding_account)
            .unwrap()
            .balance,
        fee
    );
    assert_eq!(engine.stats().entities_renewed, 1);

    let records = engine.records().records();
    assert_eq!(records.len(), 1);
    assert!(records[0].memo.contains("automatically renewed"));
    assert_eq!(records[0].new_expiry, Some(renewed.expiry));
    assert_eq!(records[0].fee, fee);

    // The fee debit and funding credit balance out.
    let net: i64 = records[0].coin_adjustments.iter().map(|a| a.amount).sum();
    assert_eq!(net, 0);
}

#[test]
fn touch_budget_stops_after_ten_and_cursor_resumes_at_eleventh() {
    let mut store = InMemoryLedger::new();
    for num in 1001..1051 {
        store.put_entity(LedgerEntity::account(num, 0).with_expiry(100));
    }
    let config = ExpiryConfig {
        max_touched_per_second: 10,
        ..removal_config()
    };
    let mut engine = ExpiryEngine::new(
        config,
        store,
        FlatFeeSource::uniform(10, 1),
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );

    engine.execute(ConsensusTime::from_secs(100_000));

    // Exactly ten entities touched; the eleventh is untouched.
    assert_eq!(engine.stats().entities_removed, 10);
    assert!(engine.store().entity(1010).is_none());
    assert!(engine.store().entity(1011).is_some());
    assert_eq!(engine.store().progress().last_scanned, 1010);

    // The next second's transaction resumes at the eleventh.
    engine.execute(ConsensusTime::from_secs(100_001));
    assert!(engine.store().entity(1011).is_none());
    assert_eq!(engine.stats().entities_removed, 20);
}

#[test]
fn interrupted_removal_resumes_from_updated_head_not_original() {
    let mut store = InMemoryLedger::new();
    store.put_entity(LedgerEntity::account(1001, 0).with_expiry(100));
    store.link_token_rels(1001, &[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]);

    let config = ExpiryConfig {
        // One classification plus exactly two unlinks per transaction.
        work_units_per_transaction: work::CLASSIFY + 2 * work::UNLINK,
        ..removal_config()
    };
    let mut engine = ExpiryEngine::new(
        config,
        store,
        FlatFeeSource::uniform(10, 1),
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );

    engine.execute(ConsensusTime::from_secs(10_000));

    // Two of five nodes unlinked; the head now points at the third.
    let suspended = engine.store().entity(1001).unwrap();
    assert_eq!(suspended.head_token_rel, Some(RelKey::new(1001, 3)));
    assert_eq!(engine.store().token_rel_count(), 3);
    assert!(engine.store().progress().retry_pending);

    // Resumption works from the updated head: two more nodes this round.
    engine.execute(ConsensusTime::from_secs(10_001));
    let suspended = engine.store().entity(1001).unwrap();
    assert_eq!(suspended.head_token_rel, Some(RelKey::new(1001, 5)));
    assert_eq!(engine.store().token_rel_count(), 1);

    // Final round: last unlink plus the entity deletion.
    engine.execute(ConsensusTime::from_secs(10_002));
    assert!(engine.store().entity(1001).is_none());
    assert_eq!(engine.store().token_rel_count(), 0);
    assert!(!engine.store().progress().retry_pending);
}

#[test]
fn replicas_processing_the_same_history_agree_exactly() {
    use rand::Rng;

    // Arbitrary genesis state, identical on both replicas.
    let mut rng = rand::thread_rng();
    let balances: Vec<u64> = (0..20).map(|_| rng.gen_range(0..5000)).collect();

    let seed = |store: &mut InMemoryLedger| {
        for (i, &balance) in balances.iter().enumerate() {
            let num = 1001 + i as u64;
            store.put_entity(
                LedgerEntity::account(num, balance)
                    .with_expiry(100 + num)
                    .with_auto_renew_period(7_776_000),
            );
        }
        store.put_entity(LedgerEntity::account(98, 0));
        store.link_token_rels(1004, &[(7001, 3), (7002, 4)]);
    };
    let history: Vec<ConsensusTime> = (0u64..30)
        .map(|i| ConsensusTime::new(5_000 + i / 3, (i % 3) as u32))
        .collect();

    let run = || {
        let mut store = InMemoryLedger::new();
        seed(&mut store);
        let mut engine = ExpiryEngine::new(
            ExpiryConfig {
                max_touched_per_second: 5,
                work_units_per_transaction: 20,
                ..removal_config()
            },
            store,
            FlatFeeSource::uniform(10, 1),
            RecordBuffer::with_defaults(),
            NoTreasuryReturns,
        );
        for &now in &history {
            engine.execute(now);
        }
        let memos: Vec<String> = engine
            .records()
            .records()
            .iter()
            .map(|r| r.memo.clone())
            .collect();
        (engine.store().progress(), engine.stats(), memos)
    };

    assert_eq!(run(), run());
}

#[test]
fn checkpoint_survives_a_restart_bit_for_bit() {
    let mut store = InMemoryLedger::new();
    for num in 1001..1011 {
        store.put_entity(LedgerEntity::account(num, 0).with_expiry(100));
    }
    let config = ExpiryConfig {
        max_touched_per_second: 4,
        ..removal_config()
    };
    let mut engine = ExpiryEngine::new(
        config.clone(),
        store,
        FlatFeeSource::uniform(10, 1),
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );
    engine.execute(ConsensusTime::from_secs(50_000));

    let durable = encode_progress(&engine.store().progress()).unwrap();

    // "Restart": a fresh store seeded with the surviving entities and the
    // decoded checkpoint picks up exactly where the old process stopped.
    let mut revived = InMemoryLedger::new();
    for num in 1001..1011 {
        if let Some(entity) = engine.store().entity(num) {
            revived.put_entity(entity);
        }
    }
    revived.put_progress(decode_progress(&durable).unwrap());
    assert_eq!(revived.progress(), engine.store().progress());

    let mut revived_engine = ExpiryEngine::new(
        config,
        revived,
        FlatFeeSource::uniform(10, 1),
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );
    revived_engine.execute(ConsensusTime::from_secs(50_001));

    // Entities 1001..=1004 went before the restart, 1005..=1008 after.
    assert!(revived_engine.store().entity(1008).is_none());
    assert!(revived_engine.store().entity(1009).is_some());
}

#[test]
fn renewed_entity_is_left_alone_until_it_expires_again() {
    let config = ExpiryConfig {
        grace_period_secs: 1000,
        first_scannable: 2000,
        ..removal_config()
    };
    let mut store = InMemoryLedger::new();
    store.put_entity(LedgerEntity::account(config.funding_account, 0));
    // Affords exactly a handful of hours.
    store.put_entity(
        LedgerEntity::account(2002, 200)
            .with_expiry(10_000)
            .with_auto_renew_period(7_776_000),
    );

    let mut engine = ExpiryEngine::new(
        config,
        store,
        StubFees {
            prices: ServicePrices {
                fixed_fee: 50,
                price_per_rb_hour: 10,
            },
            usage: 1,
        },
        RecordBuffer::with_defaults(),
        NoTreasuryReturns,
    );

    // (200 - 50) / 10 = 15 affordable hours.
    engine.execute(ConsensusTime::from_secs(10_500));
    let renewed = engine.store().entity(2002).unwrap();
    assert_eq!(renewed.expiry, 10_000 + 15 * 3600);
    assert_eq!(renewed.balance, 0);

    // Not yet re-expired: the sweep leaves it alone.
    engine.execute(ConsensusTime::from_secs(10_501));
    assert_eq!(engine.store().entity(2002).unwrap().expiry, renewed.expiry);
    assert_eq!(engine.stats().entities_renewed, 1);

    // Re-expired with a zero balance: nothing renewable, and once the
    // grace period lapses the entity is collected.
    let past_grace = renewed.expiry + 1001;
    engine.execute(ConsensusTime::from_secs(past_grace));
    assert!(engine.store().entity(2002).is_none());
    assert_eq!(engine.stats().entities_removed, 1);
}
