//! # Shared Types Crate
//!
//! This crate contains the ledger domain entities shared across Alder
//! subsystems: accounts and contracts, their owned token-relationship and
//! NFT-ownership collections, consensus time, and the adjustment entries
//! carried by system-generated records.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem ledger types are
//!   defined here.
//! - **Value Semantics**: Entities are plain serde-derived values; mutation
//!   happens through read-modify-write against the working state, never
//!   through shared mutable references.
//! - **Absence Over Sentinels**: List ends and unset pointers are
//!   `Option::None`, not reserved id values.

pub mod entities;
pub mod time;

pub use entities::*;
pub use time::ConsensusTime;
