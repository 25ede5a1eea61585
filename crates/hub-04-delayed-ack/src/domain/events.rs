//! # Lifecycle Events
//!
//! What one finalizer pass did, in the order it did it.

use hub_01_packet_store::PacketKey;
use serde::{Deserialize, Serialize};
use shared_types::{BlockContext, Height, RollappId};

/// Event emitted by the finalizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedAckEvent {
    /// A state update's dispute window elapsed without fraud.
    StateUpdateFinalized {
        /// Origin chain
        rollapp_id: RollappId,
        /// Update index
        index: u64,
        /// First covered height
        start_height: Height,
        /// Last covered height
        end_height: Height,
    },
    /// Re-verification of a queued header proved fraud.
    ChainFrozen {
        /// Origin chain
        rollapp_id: RollappId,
        /// Lowest origin height treated as fraudulent
        fraud_height: Height,
        /// Verifier explanation
        reason: String,
    },
    /// Packet finalized; `success` is false when the handler produced an
    /// error acknowledgement.
    PacketFinalized {
        /// New (finalized) key
        key: PacketKey,
        /// Whether the handler succeeded
        success: bool,
    },
    /// Packet reverted without running its handler.
    PacketReverted {
        /// New (reverted) key
        key: PacketKey,
    },
    /// Finalization aborted for this block; retried next block.
    TransitionDeferred {
        /// Unchanged (pending) key
        key: PacketKey,
        /// Failure message
        reason: String,
    },
    /// A hook failed on a revert; the revert itself was committed.
    RevertHookFailed {
        /// New (reverted) key
        key: PacketKey,
        /// Failure message
        reason: String,
    },
    /// Terminal packet deleted.
    PacketPruned {
        /// Deleted key
        key: PacketKey,
    },
}

/// Outcome of one `end_block` pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndBlockReport {
    /// Block the pass ran for.
    pub block: BlockContext,
    /// Events in emission order.
    pub events: Vec<DelayedAckEvent>,
    /// Packets finalized.
    pub finalized: usize,
    /// Packets reverted.
    pub reverted: usize,
    /// Packets deferred to a later block.
    pub deferred: usize,
    /// Packets pruned.
    pub pruned: usize,
}

impl EndBlockReport {
    /// Empty report for `block`.
    pub fn new(block: BlockContext) -> Self {
        Self {
            block,
            ..Self::default()
        }
    }

    /// Append an event and bump its counter.
    pub fn push(&mut self, event: DelayedAckEvent) {
        match &event {
            DelayedAckEvent::PacketFinalized { .. } => self.finalized += 1,
            DelayedAckEvent::PacketReverted { .. } => self.reverted += 1,
            DelayedAckEvent::TransitionDeferred { .. } => self.deferred += 1,
            DelayedAckEvent::PacketPruned { .. } => self.pruned += 1,
            _ => {}
        }
        self.events.push(event);
    }

    /// Whether nothing happened.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Keys finalized in this pass, in order.
    pub fn finalized_keys(&self) -> Vec<&PacketKey> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DelayedAckEvent::PacketFinalized { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Keys reverted in this pass, in order.
    pub fn reverted_keys(&self) -> Vec<&PacketKey> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DelayedAckEvent::PacketReverted { key } => Some(key),
                _ => None,
            })
            .collect()
    }
}
