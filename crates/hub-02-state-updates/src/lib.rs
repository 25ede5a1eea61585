//! # HUB-02 State-Update Ledger
//!
//! Per-rollapp record of submitted state roots and their trust status.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Sequencers submit batches of origin-chain blocks as state updates. Each
//! update stays `Unverified` for the dispute period and then finalizes
//! unless fraud is proven against it first:
//!
//! ```text
//! [UNVERIFIED] ──dispute window elapsed──→ [FINALIZED]
//!      │
//!      └──────fraud at or before it───────→ [FRAUDULENT]  (chain frozen)
//! ```
//!
//! ## Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Contiguity | next `start` = previous `end + 1`, `start <= end` |
//! | Proof shape | one block descriptor per covered height |
//! | Fraud inheritance | every later unverified update turns fraudulent |
//! | Freezing | frozen chains accept no updates and no packets |
//!
//! ## Module Structure
//!
//! ```text
//! hub-02-state-updates/
//! ├── domain/          # StateUpdate, LightClientRecord, TrustStatus, errors
//! ├── ports/           # StateUpdateLedgerApi
//! ├── service.rs       # StateUpdateLedger over a KeyValueStore
//! └── config.rs        # LedgerParams
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::{LedgerParams, DEFAULT_DISPUTE_PERIOD_SECS};
pub use domain::{
    invariant_contiguous, invariant_proof_covers_range, BlockDescriptor, LedgerError,
    LightClientRecord, StateUpdate, StateUpdateProof, TrustStatus, RECORD_PREFIX, UPDATE_PREFIX,
};
pub use ports::StateUpdateLedgerApi;
pub use service::StateUpdateLedger;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
