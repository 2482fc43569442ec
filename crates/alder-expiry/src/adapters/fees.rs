//! Static fee pricing and resource-usage estimation.
//!
//! Production prices come from the fee-schedule subsystem; this adapter
//! serves a fixed two-tier sequence and estimates an entity's
//! resource-byte-hour rate from its stored resource inputs.

use shared_types::{ConsensusTime, LedgerEntity};

use crate::ports::{FeeSource, PriceSequence, ServicePrices};

/// Fixed per-entity storage overhead, in bytes.
const BASE_ENTITY_BYTES: u64 = 32;
/// Bytes attributed to a set staking proxy.
const PROXY_BYTES: u64 = 24;
/// Bytes attributed to each token association.
const BYTES_PER_ASSOCIATION: u64 = 8;

/// [`FeeSource`] backed by a fixed price sequence.
#[derive(Debug, Clone, Copy)]
pub struct FlatFeeSource {
    sequence: PriceSequence,
}

impl FlatFeeSource {
    /// Creates a source serving the given sequence.
    pub fn new(sequence: PriceSequence) -> Self {
        Self { sequence }
    }

    /// Creates a source with identical pre- and post-switch prices.
    pub fn uniform(fixed_fee: u64, price_per_rb_hour: u64) -> Self {
        let prices = ServicePrices {
            fixed_fee,
            price_per_rb_hour,
        };
        Self::new(PriceSequence {
            pre: prices,
            switch_at: ConsensusTime::from_secs(0),
            post: prices,
        })
    }
}

impl FeeSource for FlatFeeSource {
    fn price_sequence(&self) -> PriceSequence {
        self.sequence
    }

    fn rb_usage(&self, entity: &LedgerEntity) -> u64 {
        BASE_ENTITY_BYTES
            + u64::from(entity.key_size)
            + entity.memo.len() as u64
            + if entity.has_proxy { PROXY_BYTES } else { 0 }
            + u64::from(entity.num_associations) * BYTES_PER_ASSOCIATION
    }
}
