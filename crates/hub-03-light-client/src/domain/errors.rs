//! # Domain Errors
//!
//! Error types for the Light-Client Verifier.

use hub_02_state_updates::LedgerError;
use shared_types::{CodecError, KVStoreError};
use thiserror::Error;

/// Verifier error types.
///
/// `Unknown` and `Fraudulent` are outcomes, not errors.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// Ledger rejected the lookup or the fraud marking.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Stored value could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
