//! # Removal Engine
//!
//! Garbage-collects an entity whose grace period has lapsed. The work is a
//! resumable state machine; a round can suspend it only at phase
//! boundaries, never mid-pointer-update, so the owned collections stay
//! structurally consistent across rounds:
//!
//! 1. **Treasury return**: if the entity is a treasury for tokens with
//!    outstanding supply, return held balances step by step.
//! 2. **Collection unlink**: pop the head of the token-relationship list,
//!    then the NFT list, one throttle-priced excision at a time, advancing
//!    the entity's head pointer after each pop.
//! 3. **Entity deletion**: once both lists are empty, remove the entity
//!    record itself.
//!
//! Every invocation emits exactly one synthetic record: a deletion record
//! when phase 3 completes, otherwise a treasury-return record carrying the
//! adjustments performed so far in this call.

use shared_types::{ConsensusTime, EntityKind, EntityNum, NftKey, NftOwnership, RelKey, TokenAdjustment, TokenRel};

use super::entities::EntityProcessResult;
use super::linked_list::excise;
use super::throttle::{work, AdmissionThrottle};
use crate::ports::{LedgerStore, NodeStore, RecordSink, SyntheticRecord, TreasuryReturner};

/// Attempts to remove the account at `num`; resumable across rounds.
pub fn try_remove_account<S, R, T>(
    store: &mut S,
    records: &mut R,
    treasury: &mut T,
    throttle: &mut AdmissionThrottle,
    num: EntityNum,
    cycle_time: ConsensusTime,
) -> EntityProcessResult
where
    S: LedgerStore,
    R: RecordSink,
    T: TreasuryReturner,
{
    try_remove(
        store,
        records,
        treasury,
        throttle,
        num,
        EntityKind::Account,
        cycle_time,
    )
}

/// Attempts to remove the contract at `num`; resumable across rounds.
pub fn try_remove_contract<S, R, T>(
    store: &mut S,
    records: &mut R,
    treasury: &mut T,
    throttle: &mut AdmissionThrottle,
    num: EntityNum,
    cycle_time: ConsensusTime,
) -> EntityProcessResult
where
    S: LedgerStore,
    R: RecordSink,
    T: TreasuryReturner,
{
    try_remove(
        store,
        records,
        treasury,
        throttle,
        num,
        EntityKind::Contract,
        cycle_time,
    )
}

fn try_remove<S, R, T>(
    store: &mut S,
    records: &mut R,
    treasury: &mut T,
    throttle: &mut AdmissionThrottle,
    num: EntityNum,
    expected: EntityKind,
    cycle_time: ConsensusTime,
) -> EntityProcessResult
where
    S: LedgerStore,
    R: RecordSink,
    T: TreasuryReturner,
{
    let Some(mut entity) = store.entity(num) else {
        tracing::warn!(entity = num, "removal requested for a missing entity");
        return EntityProcessResult::NothingToDo;
    };
    if entity.kind != expected {
        tracing::warn!(
            entity = num,
            kind = ?entity.kind,
            expected = ?expected,
            "removal requested under the wrong entity kind"
        );
        return EntityProcessResult::NothingToDo;
    }

    let mut adjustments: Vec<TokenAdjustment> = Vec::new();

    // Phase 1: treasury return, to completion, before any unlinking.
    if treasury.is_treasury(num) {
        let step = treasury.return_step(num, throttle);
        adjustments.extend(step.adjustments);
        if !step.finished {
            publish_partial(records, num, cycle_time, adjustments);
            return EntityProcessResult::StillMoreToDo;
        }
    }

    // Phase 2: drain the token-relationship list, head first.
    while let Some(head) = entity.head_token_rel {
        if !throttle.allow(work::UNLINK) {
            store.put_entity(entity);
            publish_partial(records, num, cycle_time, adjustments);
            return EntityProcessResult::StillMoreToDo;
        }
        if let Some(rel) = NodeStore::<RelKey, TokenRel>::get(store, &head) {
            if rel.balance > 0 {
                adjustments.push(TokenAdjustment {
                    token: head.token,
                    account: num,
                    amount: -(rel.balance as i64),
                });
            }
            entity.head_token_rel = excise::<RelKey, TokenRel, S>(store, head)
                .and_then(|excision| excision.next);
        } else {
            tracing::warn!(entity = num, ?head, "dangling token-relationship head");
            entity.head_token_rel = None;
        }
    }

    // Phase 2, continued: drain the NFT-ownership list.
    while let Some(head) = entity.head_nft {
        if !throttle.allow(work::UNLINK) {
            store.put_entity(entity);
            publish_partial(records, num, cycle_time, adjustments);
            return EntityProcessResult::StillMoreToDo;
        }
        if NodeStore::<NftKey, NftOwnership>::get(store, &head).is_some() {
            adjustments.push(TokenAdjustment {
                token: head.token,
                account: num,
                amount: -1,
            });
            entity.head_nft = excise::<NftKey, NftOwnership, S>(store, head)
                .and_then(|excision| excision.next);
        } else {
            tracing::warn!(entity = num, ?head, "dangling NFT-ownership head");
            entity.head_nft = None;
        }
    }

    // Phase 3: both lists are empty, remove the entity record itself.
    if !throttle.allow(work::DELETE) {
        store.put_entity(entity);
        publish_partial(records, num, cycle_time, adjustments);
        return EntityProcessResult::StillMoreToDo;
    }
    store.remove_entity(num);
    tracing::debug!(entity = num, "entity automatically deleted");
    records.publish(SyntheticRecord {
        entity: num,
        memo: format!("Entity {num} was automatically deleted."),
        event_time: cycle_time,
        coin_adjustments: vec![],
        token_adjustments: adjustments,
        new_expiry: None,
        fee: 0,
    });

    EntityProcessResult::Done
}

fn publish_partial<R: RecordSink>(
    records: &mut R,
    num: EntityNum,
    cycle_time: ConsensusTime,
    adjustments: Vec<TokenAdjustment>,
) {
    records.publish(SyntheticRecord {
        entity: num,
        memo: format!("Entity {num} returned treasury assets."),
        event_time: cycle_time,
        coin_adjustments: vec![],
        token_adjustments: adjustments,
        new_expiry: None,
        fee: 0,
    });
}
