//! Storage ports: the working-state ledger collections.
//!
//! The expiry engine runs inside consensus handling against the node's
//! working state, which behaves like a map: lookups are by value and
//! infallible, and mutation is read-modify-write under the same key.
//! Snapshot isolation and durability are the storage collaborator's
//! concern, not this subsystem's.

use shared_types::{EntityNum, LedgerEntity, NftKey, NftOwnership, RelKey, TokenRel};

use crate::domain::ScanProgress;

/// A keyed node collection with read-modify-write access.
///
/// Replaces a mutable-handle (`get_for_modify`) pattern: read the node by
/// value, compute the updated value, write it back under the same key.
pub trait NodeStore<K, V> {
    /// Reads the node at `key`, if present.
    fn get(&self, key: &K) -> Option<V>;

    /// Writes `value` under `key`, replacing any previous node.
    fn put(&mut self, key: K, value: V);

    /// Removes the node at `key`; absent keys are a no-op.
    fn remove(&mut self, key: &K);
}

/// Working-state view of everything the expiry engine touches: entities by
/// number, both owned node collections, and the durable scan checkpoint.
pub trait LedgerStore: NodeStore<RelKey, TokenRel> + NodeStore<NftKey, NftOwnership> {
    /// Reads the entity with the given number, if present.
    fn entity(&self, num: EntityNum) -> Option<LedgerEntity>;

    /// Writes an entity back under its own number.
    fn put_entity(&mut self, entity: LedgerEntity);

    /// Removes the entity record; absent numbers are a no-op.
    fn remove_entity(&mut self, num: EntityNum);

    /// First entity number not yet assigned. The scan cursor wraps here;
    /// an empty universe has `wrap_bound() == first_scannable`.
    fn wrap_bound(&self) -> EntityNum;

    /// Reads the durable scan checkpoint.
    fn progress(&self) -> ScanProgress;

    /// Writes the durable scan checkpoint.
    fn put_progress(&mut self, progress: ScanProgress);
}
