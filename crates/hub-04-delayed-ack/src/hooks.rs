//! # Hook Dispatcher
//!
//! Fixed-order fan-out to every registered [`DelayedAckHooks`] listener.
//!
//! - `after_packet_status_updated` runs listeners in order and stops at the
//!   first error, which is returned to the finalizer.
//! - `after_packet_deleted` always runs every listener.
//!
//! The listener list is built once at application assembly and never
//! changes afterwards.

use crate::domain::HookError;
use crate::ports::DelayedAckHooks;
use hub_01_packet_store::{PacketKey, RollappPacket};
use shared_types::KeyValueStore;
use tracing::debug;

/// Ordered list of listeners.
#[derive(Default)]
pub struct MultiDelayedAckHooks {
    hooks: Vec<Box<dyn DelayedAckHooks>>,
}

impl MultiDelayedAckHooks {
    /// Build the dispatcher from listeners in registration order.
    pub fn new(hooks: Vec<Box<dyn DelayedAckHooks>>) -> Self {
        Self { hooks }
    }

    /// Dispatcher without listeners.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Listener names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }
}

impl std::fmt::Debug for MultiDelayedAckHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiDelayedAckHooks")
            .field("hooks", &self.names())
            .finish()
    }
}

impl DelayedAckHooks for MultiDelayedAckHooks {
    fn name(&self) -> &str {
        "multi"
    }

    fn after_packet_status_updated(
        &self,
        store: &mut dyn KeyValueStore,
        packet: &RollappPacket,
        old_key: &PacketKey,
        new_key: &PacketKey,
    ) -> Result<(), HookError> {
        for hook in &self.hooks {
            if let Err(e) = hook.after_packet_status_updated(store, packet, old_key, new_key) {
                debug!(hook = hook.name(), key = %old_key, "[hub-04] Hook chain stopped");
                return Err(e);
            }
        }
        Ok(())
    }

    fn after_packet_deleted(&self, store: &mut dyn KeyValueStore, packet: &RollappPacket) {
        for hook in &self.hooks {
            hook.after_packet_deleted(store, packet);
        }
    }
}

/// Listener that does nothing; embed it to implement only what you need.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseDelayedAckHook;

impl DelayedAckHooks for BaseDelayedAckHook {
    fn name(&self) -> &str {
        "base"
    }
}
