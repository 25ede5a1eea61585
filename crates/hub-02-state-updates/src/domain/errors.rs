//! # Domain Errors
//!
//! Error types for the State-Update Ledger.

use shared_types::{CodecError, Height, KVStoreError, RollappId};
use thiserror::Error;

/// State-update ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Submitted range does not continue the chain's previous update.
    #[error("Non-contiguous range [{start}, {end}], expected start {expected_start}")]
    NonContiguousRange {
        /// Submitted start height
        start: Height,
        /// Submitted end height
        end: Height,
        /// Height the range had to start at
        expected_start: Height,
    },

    /// Chain is frozen after a fraud determination.
    #[error("Rollapp {0} is frozen")]
    ChainFrozen(RollappId),

    /// Chain was never registered.
    #[error("Unknown rollapp: {0}")]
    UnknownRollapp(RollappId),

    /// Identifier empty or longer than `MAX_ROLLAPP_ID_LEN` bytes.
    #[error("Invalid rollapp id ({len} bytes)")]
    InvalidRollappId {
        /// Identifier length in bytes
        len: usize,
    },

    /// Packet anchored below the first height any state update attests.
    #[error("Height {height} of {rollapp_id} is below first attested height {first_height}")]
    HeightBeforeFirstUpdate {
        /// Origin chain
        rollapp_id: RollappId,
        /// Rejected height
        height: Height,
        /// Lowest height a state update may cover
        first_height: Height,
    },

    /// Chain registered twice.
    #[error("Rollapp already registered: {0}")]
    RollappAlreadyRegistered(RollappId),

    /// Block descriptors do not match the submitted range.
    #[error("Invalid state update proof: {0}")]
    InvalidProof(String),

    /// No state update with this index.
    #[error("State update {index} of {rollapp_id} not found")]
    UpdateNotFound {
        /// Origin chain
        rollapp_id: RollappId,
        /// Update index
        index: u64,
    },

    /// Ledger parameters rejected.
    #[error("Invalid ledger params: {0}")]
    InvalidParams(String),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Stored value could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
