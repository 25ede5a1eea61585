//! # Node Runtime Library
//!
//! This library exposes the internal modules of the hub node for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `container/` - Node configuration and the assembled [`HubApp`]
//! - `adapters/` - Storage backends behind the `KeyValueStore` port
//! - `handlers/` - Transfer application and order-tracking listener
//! - `wiring/` - Scenario replay feeding inputs into the hub

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod wiring;

// Re-exports
pub use container::{ConfigError, HubApp, HubError, HubResult, NodeConfig, StorageBackend};
pub use handlers::{OrderTrackingHook, TransferApp, TransferPacketData};
pub use wiring::{replay, ScenarioSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
