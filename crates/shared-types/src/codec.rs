//! Bincode helpers for values persisted in the [`KeyValueStore`](crate::KeyValueStore).

use crate::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value for storage.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(bincode::serialize(value)?)
}

/// Decode a stored value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(bincode::deserialize(bytes)?)
}
