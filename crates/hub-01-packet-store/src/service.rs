//! # Packet Store Service
//!
//! [`PacketStoreApi`] over any [`KeyValueStore`].

use crate::domain::{
    invariant_legal_transition, Acknowledgement, PacketId, PacketKey, PacketStatus,
    PacketStoreError, RollappPacket,
};
use crate::ports::PacketStoreApi;
use shared_types::{decode, encode, BatchOperation, Height, KeyValueStore, RollappId, Timestamp};
use tracing::debug;

/// Status-keyed packet store.
///
/// Holds no state of its own; all records live in the store passed to each
/// call.
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketStore;

impl PacketStore {
    /// Create a packet store.
    pub fn new() -> Self {
        Self
    }

    fn read(
        &self,
        store: &dyn KeyValueStore,
        key: &PacketKey,
    ) -> Result<Option<RollappPacket>, PacketStoreError> {
        match store.get(&key.to_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan(
        &self,
        store: &dyn KeyValueStore,
        prefix: &[u8],
    ) -> Result<Vec<RollappPacket>, PacketStoreError> {
        store
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, value)| decode::<RollappPacket>(&value).map_err(PacketStoreError::from))
            .collect()
    }
}

impl PacketStoreApi for PacketStore {
    fn enqueue(
        &self,
        store: &mut dyn KeyValueStore,
        packet: RollappPacket,
    ) -> Result<PacketKey, PacketStoreError> {
        if packet.status != PacketStatus::Pending {
            return Err(PacketStoreError::InvalidInitialStatus(packet.status));
        }

        let id = packet.id();
        for status in PacketStatus::ALL {
            let existing = PacketKey::new(status, id.clone());
            if store.exists(&existing.to_bytes())? {
                return Err(PacketStoreError::DuplicateKey(existing.to_string()));
            }
        }

        let key = packet.key();
        store.put(&key.to_bytes(), &encode(&packet)?)?;
        debug!(key = %key, "[hub-01] Packet enqueued");
        Ok(key)
    }

    fn get(
        &self,
        store: &dyn KeyValueStore,
        key: &PacketKey,
    ) -> Result<RollappPacket, PacketStoreError> {
        self.read(store, key)?
            .ok_or_else(|| PacketStoreError::NotFound(key.to_string()))
    }

    fn get_by_id(
        &self,
        store: &dyn KeyValueStore,
        id: &PacketId,
    ) -> Result<RollappPacket, PacketStoreError> {
        for status in PacketStatus::ALL {
            if let Some(packet) = self.read(store, &PacketKey::new(status, id.clone()))? {
                return Ok(packet);
            }
        }
        Err(PacketStoreError::NotFound(id.to_string()))
    }

    fn record_outcome(
        &self,
        store: &mut dyn KeyValueStore,
        key: &PacketKey,
        acknowledgement: Acknowledgement,
        error: Option<String>,
    ) -> Result<(), PacketStoreError> {
        let mut packet = self.get(store, key)?;
        if packet.status != PacketStatus::Pending {
            return Err(PacketStoreError::InvalidTransition {
                from: packet.status,
                to: PacketStatus::Finalized,
            });
        }
        packet.acknowledgement = Some(acknowledgement);
        packet.error = error;
        store.put(&key.to_bytes(), &encode(&packet)?)?;
        Ok(())
    }

    fn update_status(
        &self,
        store: &mut dyn KeyValueStore,
        key: &PacketKey,
        new_status: PacketStatus,
        at: Timestamp,
    ) -> Result<(RollappPacket, PacketKey), PacketStoreError> {
        let mut packet = self.get(store, key)?;
        invariant_legal_transition(packet.status, new_status)?;

        packet.status = new_status;
        packet.status_updated_at = Some(at);
        let new_key = packet.key();

        store.atomic_batch_write(vec![
            BatchOperation::delete(key.to_bytes()),
            BatchOperation::put(new_key.to_bytes(), encode(&packet)?),
        ])?;

        debug!(old_key = %key, new_key = %new_key, "[hub-01] Packet status updated");
        Ok((packet, new_key))
    }

    fn list_pending(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        max_proof_height: Height,
    ) -> Result<Vec<RollappPacket>, PacketStoreError> {
        let prefix = PacketKey::rollapp_prefix(PacketStatus::Pending, rollapp_id);
        let mut packets = self.scan(store, &prefix)?;
        // Keys are height-ordered, so everything past the first miss is higher.
        let cut = packets
            .iter()
            .position(|p| p.proof_height > max_proof_height)
            .unwrap_or(packets.len());
        packets.truncate(cut);
        Ok(packets)
    }

    fn list_by_status(
        &self,
        store: &dyn KeyValueStore,
        status: PacketStatus,
    ) -> Result<Vec<RollappPacket>, PacketStoreError> {
        self.scan(store, &PacketKey::status_prefix(status))
    }

    fn prune(
        &self,
        store: &mut dyn KeyValueStore,
        key: &PacketKey,
    ) -> Result<(), PacketStoreError> {
        if !key.status.is_terminal() {
            return Err(PacketStoreError::NotTerminal(key.to_string()));
        }
        if !store.exists(&key.to_bytes())? {
            return Err(PacketStoreError::NotFound(key.to_string()));
        }
        store.delete(&key.to_bytes())?;
        debug!(key = %key, "[hub-01] Packet pruned");
        Ok(())
    }
}
