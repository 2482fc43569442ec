//! Adapters layer for the expiry subsystem.
//!
//! Concrete implementations of the port traits:
//! - `memory`: HashMap-backed working state for unit tests
//! - `records`: collecting record sink with retention-window eviction
//! - `fees`: static two-tier price sequence and usage estimation
//! - `treasury`: null-object and in-memory treasury-return collaborators
//! - `checkpoint`: exact-round-trip codec for the durable scan checkpoint

pub mod checkpoint;
pub mod fees;
pub mod memory;
pub mod records;
pub mod treasury;

pub use checkpoint::*;
pub use fees::*;
pub use memory::*;
pub use records::*;
pub use treasury::*;
