//! # HUB-01 Packet Store
//!
//! Durable record of every in-flight and historical rollapp packet.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Packets relayed from rollapps are admitted optimistically as `Pending`
//! and kept here until the delayed-ack finalizer settles them:
//!
//! ```text
//! [PENDING] ──finalize──→ [FINALIZED] ──prune──→ (deleted)
//!     │
//!     └────────revert───→ [REVERTED]  ──prune──→ (deleted)
//! ```
//!
//! ## Key Layout
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 1 | module prefix `0x10` |
//! | 1 | status (`1` pending, `2` finalized, `3` reverted) |
//! | 2+n | length-prefixed rollapp id |
//! | 8 | proof height, big-endian |
//! | 8 | packet sequence, big-endian |
//! | 1 | packet type |
//!
//! Big-endian integers make byte order equal `(proof_height, sequence)`
//! order, so [`PacketStore::list_pending`] is a single ordered prefix scan.
//! Because the status is part of the key, a transition moves the record and
//! hooks observe both the old and the new key.
//!
//! ## Module Structure
//!
//! ```text
//! hub-01-packet-store/
//! ├── domain/          # RollappPacket, PacketKey, status table, errors
//! ├── ports/           # PacketStoreApi
//! └── service.rs       # PacketStore over a KeyValueStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    invariant_causal_order, invariant_legal_transition, Acknowledgement, PacketId, PacketKey,
    PacketStatus, PacketStoreError, PacketType, RollappPacket, PACKET_PREFIX,
};
pub use ports::PacketStoreApi;
pub use service::PacketStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
