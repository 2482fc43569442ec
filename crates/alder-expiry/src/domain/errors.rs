//! Expiry subsystem error types.
//!
//! The classify/renew/remove path runs inside consensus handling and never
//! surfaces an error there; malformed state degrades to a no-op with a
//! logged warning. These errors cover the edges that can legitimately fail:
//! configuration validation and durable-checkpoint encoding.

use thiserror::Error;

/// Expiry subsystem error type.
#[derive(Debug, Error)]
pub enum ExpiryError {
    /// The configuration cannot be run under.
    #[error("invalid expiry configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },

    /// The durable scan checkpoint failed to encode or decode.
    #[error("scan checkpoint codec failure: {0}")]
    CheckpointCodec(String),
}
