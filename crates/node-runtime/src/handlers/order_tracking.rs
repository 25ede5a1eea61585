//! # Order Tracking Hook
//!
//! Keeps a packet-keyed index of demand orders in step with packet status.
//!
//! A demand order is filed against the packet's current store key. Because
//! the key changes with every status change, the index entry has to move
//! with it; the hook re-files the order under the new key and drops it when
//! the packet is pruned.

use hub_01_packet_store::{PacketKey, PacketStatus, RollappPacket};
use hub_04_delayed_ack::{DelayedAckHooks, HookError};
use serde::{Deserialize, Serialize};
use shared_types::{decode, encode, KVStoreError, KeyValueStore};
use tracing::{debug, warn};

/// Module prefix for the order index.
pub const ORDER_PREFIX: u8 = 0x50;

/// A demand order tied to a packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandOrder {
    /// Order identifier.
    pub order_id: String,
    /// Status of the tracked packet as last seen.
    pub packet_status: PacketStatus,
}

/// Index key of the order filed against `packet_key`.
pub fn order_key(packet_key: &PacketKey) -> Vec<u8> {
    let mut key = vec![ORDER_PREFIX];
    key.extend_from_slice(&packet_key.to_bytes());
    key
}

/// Listener maintaining the order index.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderTrackingHook;

impl OrderTrackingHook {
    /// Hook name used in logs.
    pub const NAME: &'static str = "order-tracking";

    /// Create the hook.
    pub fn new() -> Self {
        Self
    }

    /// File `order_id` against the packet stored under `packet_key`.
    pub fn track(
        store: &mut dyn KeyValueStore,
        packet_key: &PacketKey,
        order_id: impl Into<String>,
    ) -> Result<DemandOrder, HookError> {
        let order = DemandOrder {
            order_id: order_id.into(),
            packet_status: packet_key.status,
        };
        store.put(&order_key(packet_key), &encode(&order)?)?;
        Ok(order)
    }

    /// Order filed against `packet_key`, if any.
    pub fn order_for(
        store: &dyn KeyValueStore,
        packet_key: &PacketKey,
    ) -> Result<Option<DemandOrder>, HookError> {
        match store.get(&order_key(packet_key))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Number of orders in the index.
    pub fn count(store: &dyn KeyValueStore) -> Result<usize, KVStoreError> {
        Ok(store.prefix_scan(&[ORDER_PREFIX])?.len())
    }

    fn remove(store: &mut dyn KeyValueStore, packet: &RollappPacket) -> Result<bool, HookError> {
        let key = order_key(&packet.key());
        if !store.exists(&key)? {
            return Ok(false);
        }
        store.delete(&key)?;
        Ok(true)
    }
}

impl DelayedAckHooks for OrderTrackingHook {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn after_packet_status_updated(
        &self,
        store: &mut dyn KeyValueStore,
        _packet: &RollappPacket,
        old_key: &PacketKey,
        new_key: &PacketKey,
    ) -> Result<(), HookError> {
        let Some(mut order) = Self::order_for(store, old_key)? else {
            return Ok(());
        };
        if store.exists(&order_key(new_key))? {
            return Err(HookError::failed(
                Self::NAME,
                format!("order already filed under {}", new_key),
            ));
        }

        order.packet_status = new_key.status;
        store.delete(&order_key(old_key))?;
        store.put(&order_key(new_key), &encode(&order)?)?;

        debug!("[order-tracking] order {} moved to {}", order.order_id, new_key);
        Ok(())
    }

    fn after_packet_deleted(&self, store: &mut dyn KeyValueStore, packet: &RollappPacket) {
        match Self::remove(store, packet) {
            Ok(true) => debug!("[order-tracking] order of {} dropped", packet.key()),
            Ok(false) => {}
            Err(e) => warn!("[order-tracking] failed to drop order of {}: {}", packet.key(), e),
        }
    }
}
