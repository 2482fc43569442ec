//! Collecting record sink with retention-window eviction.
//!
//! Buffers published synthetic records under a per-second slot budget and
//! evicts them once their retention window elapses. Historical records are
//! tracked by the monotonic expiry queue (publication follows consensus
//! time, which never decreases); the per-payer index is tracked by the
//! priority variant, whose shorter window makes its tracking order
//! interleave across payers.

use std::collections::HashMap;

use shared_types::{ConsensusTime, EntityNum};

use crate::domain::{ExpiryTracker, MonotonicExpiryQueue, PriorityExpiryQueue};
use crate::ports::{RecordSink, SyntheticRecord};

/// Monotonically assigned record identifier.
pub type RecordId = u64;

/// In-memory [`RecordSink`] with TTL-bounded retention.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    max_per_second: u32,
    history_ttl_secs: u64,
    payer_ttl_secs: u64,
    second: u64,
    published_this_second: u32,
    next_id: RecordId,
    records: HashMap<RecordId, SyntheticRecord>,
    by_payer: HashMap<EntityNum, Vec<RecordId>>,
    history_expiries: MonotonicExpiryQueue<RecordId>,
    payer_expiries: PriorityExpiryQueue<(EntityNum, RecordId)>,
}

impl RecordBuffer {
    /// Creates a buffer with the given per-second slot budget and
    /// retention windows (history and per-payer, in seconds).
    pub fn new(max_per_second: u32, history_ttl_secs: u64, payer_ttl_secs: u64) -> Self {
        Self {
            max_per_second,
            history_ttl_secs,
            payer_ttl_secs,
            ..Default::default()
        }
    }

    /// A buffer with a generous slot budget and three-minute retention.
    pub fn with_defaults() -> Self {
        Self::new(100, 180, 180)
    }

    /// All retained records, in publication order of their ids.
    pub fn records(&self) -> Vec<&SyntheticRecord> {
        let mut ids: Vec<&RecordId> = self.records.keys().collect();
        ids.sort_unstable();
        ids.into_iter().map(|id| &self.records[id]).collect()
    }

    /// Retained record ids published for the given entity.
    pub fn ids_for_payer(&self, payer: EntityNum) -> &[RecordId] {
        self.by_payer.get(&payer).map_or(&[], Vec::as_slice)
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Evicts every record whose retention window lapsed at `now`,
    /// invoking `purge` once per evicted record id.
    pub fn purge_expired_at(&mut self, now: ConsensusTime, mut purge: impl FnMut(RecordId)) {
        let records = &mut self.records;
        self.history_expiries.purge_expired(now.seconds, |id| {
            if records.remove(&id).is_some() {
                purge(id);
            }
        });
        let by_payer = &mut self.by_payer;
        self.payer_expiries.purge_expired(now.seconds, |(payer, id)| {
            if let Some(ids) = by_payer.get_mut(&payer) {
                ids.retain(|&kept| kept != id);
                if ids.is_empty() {
                    by_payer.remove(&payer);
                }
            }
        });
    }
}

impl RecordSink for RecordBuffer {
    fn has_capacity(&self, now: ConsensusTime) -> bool {
        now.seconds != self.second || self.published_this_second < self.max_per_second
    }

    fn publish(&mut self, record: SyntheticRecord) {
        let at = record.event_time;
        if at.seconds != self.second {
            self.second = at.seconds;
            self.published_this_second = 0;
        }
        self.published_this_second += 1;

        let id = self.next_id;
        self.next_id += 1;
        self.by_payer.entry(record.entity).or_default().push(id);
        self.history_expiries
            .track(id, at.seconds + self.history_ttl_secs);
        self.payer_expiries
            .track((record.entity, id), at.seconds + self.payer_ttl_secs);
        self.records.insert(id, record);
    }
}
