//! # Inbound Ports
//!
//! API trait driven once per hub block.

use crate::domain::{EndBlockReport, Result};
use shared_types::{BlockContext, KeyValueStore};

/// Packet Finalizer API - inbound port.
pub trait PacketFinalizerApi {
    /// Advance every rollapp's packets for the block described by `block`.
    ///
    /// Deterministic: chains ascending by identifier, packets ascending by
    /// `(proof_height, sequence)`. Per-packet failures are contained in the
    /// report; an `Err` means the store itself failed and the block must be
    /// discarded.
    fn end_block(
        &self,
        store: &mut dyn KeyValueStore,
        block: BlockContext,
    ) -> Result<EndBlockReport>;
}
