//! # Core Ledger Entities
//!
//! Defines the ledger entities touched by the lifecycle subsystem.
//!
//! ## Clusters
//!
//! - **Entities**: `LedgerEntity` (account or contract) and `EntityKind`
//! - **Owned Collections**: `TokenRel`, `NftOwnership` and their composite keys
//! - **Record Payloads**: `CoinAdjustment`, `TokenAdjustment`
//!
//! ## Intrusive Lists
//!
//! Each entity owns up to two intrusive doubly linked lists: its token
//! relationships and its NFT ownership records. The `prev`/`next` pointers
//! live inside the persisted node values themselves and the list is rooted
//! at the owning entity's head-pointer field. `None` marks a list end; a
//! `Some` pointer must always name a key present in the collection.

use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: ENTITIES
// =============================================================================

/// Numeric identifier of a ledger entity (account or contract).
pub type EntityNum = u64;

/// The kind of a ledger entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A cryptocurrency account.
    Account,
    /// A smart-contract account.
    Contract,
}

/// An account or contract in persistent ledger state.
///
/// Only the fields the lifecycle subsystem reads or writes are modeled:
/// expiry bookkeeping, the balance (debited by renewal fees), the deletion
/// flag, the resource-usage inputs that drive renewal pricing, and the head
/// pointers of the two owned collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntity {
    /// The entity's number.
    pub num: EntityNum,
    /// Account or contract.
    pub kind: EntityKind,
    /// Expiry, in seconds since the epoch.
    pub expiry: u64,
    /// Requested auto-renew period in seconds.
    pub auto_renew_period: u64,
    /// Balance in base denomination units.
    pub balance: u64,
    /// True once the entity has been deleted.
    pub deleted: bool,
    /// Encoded size of the entity's key, in bytes.
    pub key_size: u32,
    /// The entity's memo.
    pub memo: String,
    /// True if the entity has a staking proxy set.
    pub has_proxy: bool,
    /// Number of token relationships the entity holds.
    pub num_associations: u32,
    /// Head of the token-relationship list, `None` when empty.
    pub head_token_rel: Option<RelKey>,
    /// Head of the NFT-ownership list, `None` when empty.
    pub head_nft: Option<NftKey>,
}

impl LedgerEntity {
    /// Creates an account with the given number and balance.
    pub fn account(num: EntityNum, balance: u64) -> Self {
        Self::new(num, EntityKind::Account, balance)
    }

    /// Creates a contract with the given number and balance.
    pub fn contract(num: EntityNum, balance: u64) -> Self {
        Self::new(num, EntityKind::Contract, balance)
    }

    fn new(num: EntityNum, kind: EntityKind, balance: u64) -> Self {
        Self {
            num,
            kind,
            expiry: 0,
            auto_renew_period: 0,
            balance,
            deleted: false,
            key_size: 32,
            memo: String::new(),
            has_proxy: false,
            num_associations: 0,
            head_token_rel: None,
            head_nft: None,
        }
    }

    /// Builder method to set the expiry.
    pub fn with_expiry(mut self, expiry: u64) -> Self {
        self.expiry = expiry;
        self
    }

    /// Builder method to set the auto-renew period.
    pub fn with_auto_renew_period(mut self, period: u64) -> Self {
        self.auto_renew_period = period;
        self
    }

    /// Builder method to set the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

// =============================================================================
// CLUSTER B: OWNED COLLECTIONS
// =============================================================================

/// Composite key of a token relationship: (owning account, token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelKey {
    /// The owning account or contract.
    pub account: EntityNum,
    /// The associated token.
    pub token: EntityNum,
}

impl RelKey {
    /// Creates a relationship key.
    pub const fn new(account: EntityNum, token: EntityNum) -> Self {
        Self { account, token }
    }
}

/// A token relationship node in an entity's intrusive list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRel {
    /// Units of the token held through this relationship.
    pub balance: u64,
    /// Previous node in the owner's list, `None` at the head.
    pub prev: Option<RelKey>,
    /// Next node in the owner's list, `None` at the tail.
    pub next: Option<RelKey>,
}

impl TokenRel {
    /// Creates a detached relationship node with the given balance.
    pub const fn new(balance: u64) -> Self {
        Self {
            balance,
            prev: None,
            next: None,
        }
    }
}

/// Composite key of an NFT: (token, serial number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NftKey {
    /// The token type the serial belongs to.
    pub token: EntityNum,
    /// The serial number, unique within the token type.
    pub serial: u64,
}

impl NftKey {
    /// Creates an NFT key.
    pub const fn new(token: EntityNum, serial: u64) -> Self {
        Self { token, serial }
    }
}

/// An NFT ownership node in an entity's intrusive list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOwnership {
    /// The owning account or contract.
    pub owner: EntityNum,
    /// Previous node in the owner's list, `None` at the head.
    pub prev: Option<NftKey>,
    /// Next node in the owner's list, `None` at the tail.
    pub next: Option<NftKey>,
}

impl NftOwnership {
    /// Creates a detached ownership node for the given owner.
    pub const fn new(owner: EntityNum) -> Self {
        Self {
            owner,
            prev: None,
            next: None,
        }
    }
}

// =============================================================================
// CLUSTER C: RECORD PAYLOADS
// =============================================================================

/// A base-denomination balance change carried by a system-generated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAdjustment {
    /// The adjusted account.
    pub account: EntityNum,
    /// Signed change in base units.
    pub amount: i64,
}

/// A token-unit balance change carried by a system-generated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAdjustment {
    /// The token whose units moved.
    pub token: EntityNum,
    /// The adjusted account.
    pub account: EntityNum,
    /// Signed change in token units; for NFTs, ownership count.
    pub amount: i64,
}
