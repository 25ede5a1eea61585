//! # Inbound Ports
//!
//! API trait defining what the Packet Store can do.
//!
//! Every operation takes the store it works on explicitly: the block
//! executor owns committed state and may hand in a [`StoreOverlay`] instead
//! of the committed store to make a unit of work atomic.
//!
//! [`StoreOverlay`]: shared_types::StoreOverlay

use crate::domain::{
    Acknowledgement, PacketId, PacketKey, PacketStatus, PacketStoreError, RollappPacket,
};
use shared_types::{Height, KeyValueStore, RollappId, Timestamp};

/// Packet Store API - inbound port.
pub trait PacketStoreApi {
    /// Insert a new pending packet; fails with `DuplicateKey` if a packet
    /// with the same identity exists under any status.
    fn enqueue(
        &self,
        store: &mut dyn KeyValueStore,
        packet: RollappPacket,
    ) -> Result<PacketKey, PacketStoreError>;

    /// Read the packet stored under `key`.
    fn get(&self, store: &dyn KeyValueStore, key: &PacketKey)
        -> Result<RollappPacket, PacketStoreError>;

    /// Find a packet by identity under whichever status it currently has.
    fn get_by_id(
        &self,
        store: &dyn KeyValueStore,
        id: &PacketId,
    ) -> Result<RollappPacket, PacketStoreError>;

    /// Record the deferred handler outcome on a pending packet.
    fn record_outcome(
        &self,
        store: &mut dyn KeyValueStore,
        key: &PacketKey,
        acknowledgement: Acknowledgement,
        error: Option<String>,
    ) -> Result<(), PacketStoreError>;

    /// Move a packet to `new_status`, rejecting anything outside the
    /// transition table. Returns the updated packet and its new key.
    fn update_status(
        &self,
        store: &mut dyn KeyValueStore,
        key: &PacketKey,
        new_status: PacketStatus,
        at: Timestamp,
    ) -> Result<(RollappPacket, PacketKey), PacketStoreError>;

    /// Pending packets of `rollapp_id` with `proof_height <= max_proof_height`,
    /// ascending by `(proof_height, sequence)`.
    fn list_pending(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        max_proof_height: Height,
    ) -> Result<Vec<RollappPacket>, PacketStoreError>;

    /// Every packet with `status`, in key order.
    fn list_by_status(
        &self,
        store: &dyn KeyValueStore,
        status: PacketStatus,
    ) -> Result<Vec<RollappPacket>, PacketStoreError>;

    /// Delete a terminal packet.
    ///
    /// Callers dispatch `after_packet_deleted` hooks before pruning.
    fn prune(&self, store: &mut dyn KeyValueStore, key: &PacketKey)
        -> Result<(), PacketStoreError>;
}
