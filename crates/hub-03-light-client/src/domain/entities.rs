//! # Domain Entities
//!
//! Client headers and the pending-header queue keys.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, Height, RollappId, Timestamp};

/// Module prefix for headers waiting for a covering state update.
pub const PENDING_HEADER_PREFIX: u8 = 0x30;

/// Origin-chain header already validated by the admission layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHeader {
    /// Origin chain.
    pub rollapp_id: RollappId,
    /// Origin-chain height.
    pub height: Height,
    /// State root committed by the header.
    pub state_root: Hash,
    /// Hash of the next validator set.
    pub next_validators_hash: Hash,
    /// Origin-chain block time.
    pub timestamp: Timestamp,
}

impl ClientHeader {
    /// Create a header.
    pub fn new(rollapp_id: RollappId, height: Height, state_root: Hash) -> Self {
        Self {
            rollapp_id,
            height,
            state_root,
            next_validators_hash: [0u8; 32],
            timestamp: 0,
        }
    }

    /// Set the header time.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the next validator set hash.
    pub fn with_next_validators_hash(mut self, hash: Hash) -> Self {
        self.next_validators_hash = hash;
        self
    }

    /// Store key in the pending-header queue.
    pub fn pending_key(&self) -> Vec<u8> {
        let mut key = pending_prefix(&self.rollapp_id);
        key.extend_from_slice(&self.height.to_be_bytes());
        key
    }
}

/// Prefix of every queued header of a chain.
pub fn pending_prefix(rollapp_id: &RollappId) -> Vec<u8> {
    let mut key = vec![PENDING_HEADER_PREFIX];
    key.extend_from_slice(&rollapp_id.key_bytes());
    key
}
