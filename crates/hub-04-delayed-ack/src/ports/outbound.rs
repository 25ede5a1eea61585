//! # Outbound Ports
//!
//! Dependencies the finalizer calls into. Both receive the store handle of
//! the packet's unit of work; their writes commit or roll back with it.

use crate::domain::{HandlerError, HookError};
use hub_01_packet_store::{Acknowledgement, PacketKey, PacketType, RollappPacket};
use shared_types::KeyValueStore;

/// Application layer that executes a packet once its origin state is
/// trusted.
pub trait DeferredPacketHandler: Send + Sync {
    /// Execute the side effects of a finalized packet.
    ///
    /// Called at most once per packet across its lifetime as far as
    /// committed state is concerned.
    fn handle_finalized_packet(
        &self,
        store: &mut dyn KeyValueStore,
        packet_type: PacketType,
        data: &[u8],
    ) -> Result<Acknowledgement, HandlerError>;
}

/// Listener notified on packet status changes and deletions.
pub trait DelayedAckHooks: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Called after a status change. An error aborts the transition of a
    /// finalizing packet for this block.
    fn after_packet_status_updated(
        &self,
        _store: &mut dyn KeyValueStore,
        _packet: &RollappPacket,
        _old_key: &PacketKey,
        _new_key: &PacketKey,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before a terminal packet is pruned. Cannot fail.
    fn after_packet_deleted(&self, _store: &mut dyn KeyValueStore, _packet: &RollappPacket) {}
}
