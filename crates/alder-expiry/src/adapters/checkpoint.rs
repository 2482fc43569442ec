//! Exact-round-trip codec for the durable scan checkpoint.
//!
//! The scan checkpoint must be identical across replicas and across
//! restarts, so the encoding is bincode's fixed, field-order-stable layout
//! rather than anything schema-evolving.

use crate::domain::{ExpiryError, ScanProgress};

/// Encodes a scan checkpoint for durable storage.
pub fn encode_progress(progress: &ScanProgress) -> Result<Vec<u8>, ExpiryError> {
    bincode::serialize(progress).map_err(|e| ExpiryError::CheckpointCodec(e.to_string()))
}

/// Decodes a scan checkpoint read back from durable storage.
pub fn decode_progress(bytes: &[u8]) -> Result<ScanProgress, ExpiryError> {
    bincode::deserialize(bytes).map_err(|e| ExpiryError::CheckpointCodec(e.to_string()))
}
