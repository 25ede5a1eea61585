//! # Error Types
//!
//! Storage and codec errors shared by all subsystems.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Value encoding/decoding errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("codec error: {0}")]
pub struct CodecError(pub String);

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        CodecError(err.to_string())
    }
}
