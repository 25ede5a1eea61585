//! # Domain Errors
//!
//! Error types for the delayed-ack finalizer, its deferred handler and its
//! hooks.

use hub_01_packet_store::PacketStoreError;
use hub_02_state_updates::LedgerError;
use hub_03_light_client::VerifierError;
use shared_types::{CodecError, KVStoreError};
use thiserror::Error;

/// Failure of a whole finalizer pass.
///
/// Only storage-level problems end up here; per-packet handler and hook
/// failures are contained and reported as events.
#[derive(Debug, Error)]
pub enum DelayedAckError {
    /// Packet store failure.
    #[error(transparent)]
    PacketStore(#[from] PacketStoreError),

    /// Ledger failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Verifier failure.
    #[error(transparent)]
    Verifier(#[from] VerifierError),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Delayed-ack parameters rejected.
    #[error("Invalid delayed-ack params: {0}")]
    InvalidParams(String),
}

/// Result type for finalizer operations.
pub type Result<T> = std::result::Result<T, DelayedAckError>;

/// Failure of the deferred packet handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The application refused the packet (e.g. insufficient funds).
    #[error("Packet rejected: {0}")]
    Rejected(String),

    /// Packet data could not be parsed.
    #[error("Malformed packet data: {0}")]
    MalformedPayload(String),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Application state could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl HandlerError {
    /// Application-level failures produce an error acknowledgement and still
    /// finalize the packet. Anything else defers the packet to the next block.
    pub fn is_application_error(&self) -> bool {
        matches!(
            self,
            HandlerError::Rejected(_) | HandlerError::MalformedPayload(_)
        )
    }
}

/// Failure of an `after_packet_status_updated` listener.
#[derive(Debug, Error)]
pub enum HookError {
    /// Listener refused the transition.
    #[error("Hook {hook} failed: {message}")]
    Failed {
        /// Listener name
        hook: String,
        /// Failure message
        message: String,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Listener state could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl HookError {
    /// Listener failure with a message.
    pub fn failed(hook: impl Into<String>, message: impl Into<String>) -> Self {
        HookError::Failed {
            hook: hook.into(),
            message: message.into(),
        }
    }
}
