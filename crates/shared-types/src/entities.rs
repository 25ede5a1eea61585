//! # Core Entities
//!
//! Identity and context types used across the hub subsystems.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// Origin-chain block height.
pub type Height = u64;

/// Hub time in seconds, as committed in the block header.
pub type Timestamp = u64;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * 3600;

/// Longest rollapp identifier accepted at registration, in bytes.
pub const MAX_ROLLAPP_ID_LEN: usize = 128;

/// Identifier of an origin chain (rollapp).
///
/// Ordered lexicographically; the finalizer walks chains in this order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RollappId(String);

impl RollappId {
    /// Create a rollapp identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is non-empty and at most
    /// [`MAX_ROLLAPP_ID_LEN`] bytes.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.len() <= MAX_ROLLAPP_ID_LEN
    }

    /// Length-prefixed byte encoding used inside store keys.
    ///
    /// The prefix keeps `"ra"` from being a key-prefix of `"ra1"`. It is a
    /// full `u64` so no identifier length can wrap into another's.
    pub fn key_bytes(&self) -> Vec<u8> {
        let raw = self.0.as_bytes();
        let mut out = Vec::with_capacity(8 + raw.len());
        out.extend_from_slice(&(raw.len() as u64).to_be_bytes());
        out.extend_from_slice(raw);
        out
    }
}

impl fmt::Display for RollappId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RollappId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Height and time of the hub block currently being processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Hub block height.
    pub height: u64,
    /// Committed block timestamp (seconds).
    pub time: Timestamp,
}

impl BlockContext {
    /// Create a block context.
    pub fn new(height: u64, time: Timestamp) -> Self {
        Self { height, time }
    }

    /// Context of the following block, `elapsed_secs` later.
    pub fn advance(&self, elapsed_secs: u64) -> Self {
        Self {
            height: self.height + 1,
            time: self.time + elapsed_secs,
        }
    }
}

/// SHA-256 of arbitrary bytes.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short hex rendering of a hash for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}
