//! # Shared Types Crate
//!
//! Types shared by every hub subsystem.
//!
//! ## Contents
//!
//! - **Identity**: [`RollappId`], [`Height`], [`Timestamp`], [`Hash`]
//! - **Execution context**: [`BlockContext`], the committed height and hub
//!   time a block is processed at. Nothing in the core reads the wall clock.
//! - **Storage port**: [`KeyValueStore`] with ordered prefix iteration,
//!   [`InMemoryKVStore`] and the write-buffering [`StoreOverlay`].
//! - **Codec**: bincode helpers for values persisted in the store.
//!
//! ## Design Principles
//!
//! - **Determinism**: every iteration the core performs goes through
//!   `prefix_scan`, which returns keys in ascending byte order on every
//!   backend. Unordered maps never decide processing order.
//! - **Single writer**: state is mutated by the block-processing context only,
//!   so the storage port takes `&mut self` and needs no locking.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod storage;

pub use codec::{decode, encode};
pub use entities::*;
pub use errors::*;
pub use storage::{BatchOperation, InMemoryKVStore, KeyValueStore, StoreOverlay};
