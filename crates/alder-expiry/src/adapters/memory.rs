//! In-memory working state for unit tests.
//!
//! Production runs against the node's tree-backed working state; tests use
//! this HashMap-backed equivalent plus helpers that seed entities and wire
//! up their intrusive lists.

use std::collections::HashMap;

use shared_types::{EntityNum, LedgerEntity, NftKey, NftOwnership, RelKey, TokenRel};

use crate::domain::ScanProgress;
use crate::ports::{LedgerStore, NodeStore};

/// HashMap-backed [`LedgerStore`].
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entities: HashMap<EntityNum, LedgerEntity>,
    token_rels: HashMap<RelKey, TokenRel>,
    nfts: HashMap<NftKey, NftOwnership>,
    progress: ScanProgress,
    next_num: EntityNum,
}

impl InMemoryLedger {
    /// Creates an empty working state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of token-relationship nodes, for assertions.
    pub fn token_rel_count(&self) -> usize {
        self.token_rels.len()
    }

    /// Number of NFT-ownership nodes, for assertions.
    pub fn nft_count(&self) -> usize {
        self.nfts.len()
    }

    /// Associates `account` with the given `(token, balance)` pairs,
    /// chaining them into the account's intrusive relationship list.
    pub fn link_token_rels(&mut self, account: EntityNum, rels: &[(EntityNum, u64)]) {
        let keys: Vec<RelKey> = rels
            .iter()
            .map(|&(token, _)| RelKey::new(account, token))
            .collect();
        for (i, &(_, balance)) in rels.iter().enumerate() {
            let mut node = TokenRel::new(balance);
            node.prev = (i > 0).then(|| keys[i - 1]);
            node.next = (i + 1 < keys.len()).then(|| keys[i + 1]);
            self.token_rels.insert(keys[i], node);
        }
        if let Some(entity) = self.entities.get_mut(&account) {
            entity.head_token_rel = keys.first().copied();
            entity.num_associations = keys.len() as u32;
        }
    }

    /// Grants `account` the given `(token, serial)` NFTs, chaining them
    /// into the account's intrusive ownership list.
    pub fn link_nfts(&mut self, account: EntityNum, nfts: &[(EntityNum, u64)]) {
        let keys: Vec<NftKey> = nfts
            .iter()
            .map(|&(token, serial)| NftKey::new(token, serial))
            .collect();
        for (i, &key) in keys.iter().enumerate() {
            let mut node = NftOwnership::new(account);
            node.prev = (i > 0).then(|| keys[i - 1]);
            node.next = (i + 1 < keys.len()).then(|| keys[i + 1]);
            self.nfts.insert(key, node);
        }
        if let Some(entity) = self.entities.get_mut(&account) {
            entity.head_nft = keys.first().copied();
        }
    }
}

impl NodeStore<RelKey, TokenRel> for InMemoryLedger {
    fn get(&self, key: &RelKey) -> Option<TokenRel> {
        self.token_rels.get(key).cloned()
    }

    fn put(&mut self, key: RelKey, value: TokenRel) {
        self.token_rels.insert(key, value);
    }

    fn remove(&mut self, key: &RelKey) {
        self.token_rels.remove(key);
    }
}

impl NodeStore<NftKey, NftOwnership> for InMemoryLedger {
    fn get(&self, key: &NftKey) -> Option<NftOwnership> {
        self.nfts.get(key).cloned()
    }

    fn put(&mut self, key: NftKey, value: NftOwnership) {
        self.nfts.insert(key, value);
    }

    fn remove(&mut self, key: &NftKey) {
        self.nfts.remove(key);
    }
}

impl LedgerStore for InMemoryLedger {
    fn entity(&self, num: EntityNum) -> Option<LedgerEntity> {
        self.entities.get(&num).cloned()
    }

    fn put_entity(&mut self, entity: LedgerEntity) {
        self.next_num = self.next_num.max(entity.num + 1);
        self.entities.insert(entity.num, entity);
    }

    fn remove_entity(&mut self, num: EntityNum) {
        self.entities.remove(&num);
    }

    fn wrap_bound(&self) -> EntityNum {
        self.next_num
    }

    fn progress(&self) -> ScanProgress {
        self.progress
    }

    fn put_progress(&mut self, progress: ScanProgress) {
        self.progress = progress;
    }
}
