//! # Domain Invariants
//!
//! Rules the Packet Store enforces centrally.

use super::entities::RollappPacket;
use super::errors::PacketStoreError;
use super::value_objects::PacketStatus;

/// Invariant: status is monotone.
///
/// `Pending` may move to `Finalized` or `Reverted` exactly once; terminal
/// statuses never change again.
pub fn invariant_legal_transition(
    from: PacketStatus,
    to: PacketStatus,
) -> Result<(), PacketStoreError> {
    if !from.can_transition_to(to) {
        return Err(PacketStoreError::InvalidTransition { from, to });
    }
    Ok(())
}

/// Invariant: causal order.
///
/// Packets of one rollapp are processed by ascending
/// `(proof_height, sequence)`.
pub fn invariant_causal_order(packets: &[RollappPacket]) -> bool {
    packets.windows(2).all(|pair| {
        pair[0].rollapp_id != pair[1].rollapp_id
            || (pair[0].proof_height, pair[0].sequence) <= (pair[1].proof_height, pair[1].sequence)
    })
}
