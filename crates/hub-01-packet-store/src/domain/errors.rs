//! # Domain Errors
//!
//! Error types for the Packet Store.

use super::value_objects::PacketStatus;
use shared_types::{CodecError, KVStoreError};
use thiserror::Error;

/// Packet store error types.
#[derive(Debug, Error)]
pub enum PacketStoreError {
    /// A packet with the same identity is already stored (double relay).
    #[error("Duplicate packet key: {0}")]
    DuplicateKey(String),

    /// No packet under the given key.
    #[error("Packet not found: {0}")]
    NotFound(String),

    /// Status change outside the transition table.
    #[error("Invalid packet transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: PacketStatus,
        /// Attempted status
        to: PacketStatus,
    },

    /// Packets enter the store as pending only.
    #[error("Packet must be enqueued as pending, got {0}")]
    InvalidInitialStatus(PacketStatus),

    /// Only terminal packets can be pruned.
    #[error("Cannot prune non-terminal packet: {0}")]
    NotTerminal(String),

    /// Stored key bytes could not be parsed.
    #[error("Malformed packet key")]
    MalformedKey,

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Stored value could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
