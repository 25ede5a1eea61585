//! Storage backends for the hub store.
//!
//! The in-memory store lives in `shared-types`; RocksDB is behind the
//! `rocksdb` feature.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
