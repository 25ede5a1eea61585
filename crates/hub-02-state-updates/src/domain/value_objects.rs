//! # Domain Value Objects
//!
//! Trust status and the block descriptors carried as state-update proof.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, Height, Timestamp};
use std::fmt;

/// Trust status of a submitted state update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustStatus {
    /// Submitted, dispute window still open or not yet evaluated.
    #[default]
    Unverified,
    /// Dispute window elapsed without fraud.
    Finalized,
    /// Proven (or inherited) fraudulent.
    Fraudulent,
}

impl TrustStatus {
    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrustStatus::Unverified)
    }
}

impl fmt::Display for TrustStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrustStatus::Unverified => "unverified",
            TrustStatus::Finalized => "finalized",
            TrustStatus::Fraudulent => "fraudulent",
        };
        f.write_str(name)
    }
}

/// Sequencer claim about a single origin-chain block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Origin-chain height.
    pub height: Height,
    /// Claimed state root after executing the block.
    pub state_root: Hash,
    /// Origin-chain block time.
    pub timestamp: Timestamp,
}

impl BlockDescriptor {
    /// Create a descriptor.
    pub fn new(height: Height, state_root: Hash, timestamp: Timestamp) -> Self {
        Self {
            height,
            state_root,
            timestamp,
        }
    }
}

/// Proof attached to a state-update submission: one descriptor per height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdateProof {
    /// Descriptors in ascending height order.
    pub block_descriptors: Vec<BlockDescriptor>,
}

impl StateUpdateProof {
    /// Wrap a list of descriptors.
    pub fn new(block_descriptors: Vec<BlockDescriptor>) -> Self {
        Self { block_descriptors }
    }
}
