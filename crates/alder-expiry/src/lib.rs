//! # Entity-Lifecycle Expiry Subsystem
//!
//! Classifies, auto-renews, and garbage-collects expired ledger entities
//! (accounts, contracts, and their owned token-relationship and NFT
//! collections). Runs synchronously inside consensus-transaction handling,
//! once per transaction, under a per-round work budget.
//!
//! ## Role in System
//!
//! - **Deterministic Sweeper**: every replica processing the same consensus
//!   history advances the same scan cursor and makes identical
//!   renew/remove decisions. No wall-clock input anywhere.
//! - **Bounded Per Round**: work is gated by an admission throttle plus
//!   per-second scan/touch budgets, so a transaction never pays an
//!   unbounded sweep cost.
//! - **Resumable**: removal of an entity with large owned collections is
//!   suspended at phase boundaries and resumed in later rounds; the durable
//!   scan checkpoint survives restarts bit-for-bit.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Scan cursor stays in `[first_scannable, wrap_bound)` | `domain/cycle.rs` cursor advance |
//! | Owned lists are empty or simple acyclic chains | `domain/linked_list.rs` excision |
//! | Renewal fee never exceeds the entity's balance | `domain/renewal.rs` quote clamp |
//! | Entity deleted only after both owned lists drain | `domain/removal.rs` phase order |
//! | Throttle denial mutates nothing | `domain/throttle.rs` `allow()` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  adapters/ - in-memory ledger, record buffer, fees, treasury   │
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ports/storage.rs  - NodeStore, LedgerStore                    │
//! │  ports/outbound.rs - FeeSource, RecordSink, TreasuryReturner   │
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  domain/cycle.rs       - once-per-transaction scan driver      │
//! │  domain/classify.rs    - lifecycle disposition of one entity   │
//! │  domain/renewal.rs     - affordable renewal quote + application│
//! │  domain/removal.rs     - resumable garbage-collection machine  │
//! │  domain/linked_list.rs - intrusive doubly-linked-list excision │
//! │  domain/queues.rs      - record-retention expiry queues        │
//! │  domain/throttle.rs    - per-round admission gate              │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
