//! # Domain Entities
//!
//! State updates, per-chain light-client records and their store keys.

use super::value_objects::{BlockDescriptor, TrustStatus};
use serde::{Deserialize, Serialize};
use shared_types::{Height, RollappId, Timestamp};

/// Module prefix for light-client records.
pub const RECORD_PREFIX: u8 = 0x20;

/// Module prefix for state updates.
pub const UPDATE_PREFIX: u8 = 0x21;

/// One batch of origin-chain blocks submitted to the hub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Origin chain.
    pub rollapp_id: RollappId,
    /// Position of this update in the chain's sequence of updates.
    pub index: u64,
    /// First covered height (inclusive).
    pub start_height: Height,
    /// Last covered height (inclusive).
    pub end_height: Height,
    /// Trust status.
    pub trust_status: TrustStatus,
    /// Hub time of submission; the dispute window starts here.
    pub submission_time: Timestamp,
    /// One descriptor per covered height.
    pub block_descriptors: Vec<BlockDescriptor>,
}

impl StateUpdate {
    /// Whether `height` falls inside `[start_height, end_height]`.
    pub fn covers(&self, height: Height) -> bool {
        (self.start_height..=self.end_height).contains(&height)
    }

    /// Descriptor recorded for `height`, if covered.
    pub fn descriptor_at(&self, height: Height) -> Option<&BlockDescriptor> {
        if !self.covers(height) {
            return None;
        }
        self.block_descriptors
            .get((height - self.start_height) as usize)
    }

    /// Store key.
    pub fn store_key(&self) -> Vec<u8> {
        update_key(&self.rollapp_id, self.index)
    }
}

/// Light-client state of one origin chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightClientRecord {
    /// Origin chain.
    pub rollapp_id: RollappId,
    /// Highest height confirmed by a matching header.
    pub last_verified_height: Height,
    /// Highest height covered by a finalized state update.
    pub finalized_height: Height,
    /// Start height of the chain's first state update.
    pub first_height: Option<Height>,
    /// Set once fraud is proven; no further state updates or packets.
    pub frozen: bool,
    /// Lowest origin height treated as fraudulent, once frozen.
    pub fraud_height: Option<Height>,
    /// Index the next submitted state update gets.
    pub next_update_index: u64,
    /// End height of the latest submitted update.
    pub latest_height: Option<Height>,
}

impl LightClientRecord {
    /// Fresh record for a newly registered chain.
    pub fn new(rollapp_id: RollappId) -> Self {
        Self {
            rollapp_id,
            last_verified_height: 0,
            finalized_height: 0,
            first_height: None,
            frozen: false,
            fraud_height: None,
            next_update_index: 0,
            latest_height: None,
        }
    }

    /// Whether `height` lies inside the finalized range
    /// `[first_height, finalized_height]`.
    pub fn is_finalized_height(&self, height: Height) -> bool {
        match self.first_height {
            Some(first) => first <= height && height <= self.finalized_height,
            None => false,
        }
    }

    /// Whether no state update can ever cover `height`.
    ///
    /// Height 0 is never attested; once the first update is in, nothing
    /// below its start is either.
    pub fn precedes_first_update(&self, height: Height) -> bool {
        height == 0 || self.first_height.is_some_and(|first| height < first)
    }

    /// Store key.
    pub fn store_key(&self) -> Vec<u8> {
        record_key(&self.rollapp_id)
    }
}

/// Store key of a chain's light-client record.
pub fn record_key(rollapp_id: &RollappId) -> Vec<u8> {
    let mut key = vec![RECORD_PREFIX];
    key.extend_from_slice(&rollapp_id.key_bytes());
    key
}

/// Prefix of every state update of a chain.
pub fn update_prefix(rollapp_id: &RollappId) -> Vec<u8> {
    let mut key = vec![UPDATE_PREFIX];
    key.extend_from_slice(&rollapp_id.key_bytes());
    key
}

/// Store key of a chain's state update number `index`.
pub fn update_key(rollapp_id: &RollappId, index: u64) -> Vec<u8> {
    let mut key = update_prefix(rollapp_id);
    key.extend_from_slice(&index.to_be_bytes());
    key
}
