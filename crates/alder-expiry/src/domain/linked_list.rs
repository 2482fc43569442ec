//! # Intrusive Linked-List Excision
//!
//! Generic removal of one node from an intrusive doubly linked list stored
//! in a keyed collection. The `prev`/`next` neighbor keys live inside the
//! persisted node values; `None` marks a list end.
//!
//! ## Algorithm
//!
//! For node X at key `k`:
//!
//! 1. Read X; let `p = prev(X)`, `n = next(X)`.
//! 2. If `p` exists, read it, point its `next` at `n`, write it back.
//! 3. If `n` exists, read it, point its `prev` at `p`, write it back.
//! 4. Remove `k` from the collection.
//!
//! After excision no remaining node's `prev`/`next` references `k`. When X
//! was the head (`p` is `None`), the caller must update the owning
//! entity's head pointer to `n`.
//!
//! Excising an absent key, or repairing around a dangling neighbor, is a
//! no-op rather than a fault: resumption after a partial round may
//! re-observe a partially updated structure.

use shared_types::{NftKey, NftOwnership, RelKey, TokenRel};

use crate::ports::NodeStore;

/// A persisted node carrying intrusive list links.
pub trait ListNode<K> {
    /// Key of the previous node, `None` at the head.
    fn prev_key(&self) -> Option<K>;

    /// Key of the next node, `None` at the tail.
    fn next_key(&self) -> Option<K>;

    /// Repoints the previous-node key; `None` marks the node as head.
    fn set_prev(&mut self, key: Option<K>);

    /// Repoints the next-node key; `None` marks the node as tail.
    fn set_next(&mut self, key: Option<K>);
}

impl ListNode<RelKey> for TokenRel {
    fn prev_key(&self) -> Option<RelKey> {
        self.prev
    }

    fn next_key(&self) -> Option<RelKey> {
        self.next
    }

    fn set_prev(&mut self, key: Option<RelKey>) {
        self.prev = key;
    }

    fn set_next(&mut self, key: Option<RelKey>) {
        self.next = key;
    }
}

impl ListNode<NftKey> for NftOwnership {
    fn prev_key(&self) -> Option<NftKey> {
        self.prev
    }

    fn next_key(&self) -> Option<NftKey> {
        self.next
    }

    fn set_prev(&mut self, key: Option<NftKey>) {
        self.prev = key;
    }

    fn set_next(&mut self, key: Option<NftKey>) {
        self.next = key;
    }
}

/// Former neighbors of an excised node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excision<K> {
    /// Key of the node that preceded the excised one, if any.
    pub prev: Option<K>,
    /// Key of the node that followed the excised one, if any.
    pub next: Option<K>,
}

impl<K> Excision<K> {
    /// True if the excised node was the list head.
    pub fn was_head(&self) -> bool {
        self.prev.is_none()
    }
}

/// Excises the node at `key`, repairing its neighbors' links.
///
/// Returns `None` (a no-op) when no node exists at `key`. Otherwise
/// returns the node's former neighbors; when [`Excision::was_head`], the
/// caller updates the owner's head pointer to `Excision::next`.
pub fn excise<K, V, S>(store: &mut S, key: K) -> Option<Excision<K>>
where
    K: Copy + PartialEq,
    V: ListNode<K>,
    S: NodeStore<K, V> + ?Sized,
{
    let node = store.get(&key)?;
    let prev = node.prev_key();
    let next = node.next_key();

    if let Some(prev_key) = prev {
        if let Some(mut prev_node) = store.get(&prev_key) {
            prev_node.set_next(next);
            store.put(prev_key, prev_node);
        }
    }
    if let Some(next_key) = next {
        if let Some(mut next_node) = store.get(&next_key) {
            next_node.set_prev(prev);
            store.put(next_key, next_node);
        }
    }
    store.remove(&key);

    Some(Excision { prev, next })
}
