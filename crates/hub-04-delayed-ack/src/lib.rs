//! # HUB-04 Delayed-Ack Finalizer
//!
//! Drives rollapp packets from `Pending` to `Finalized` or `Reverted` once
//! per hub block and notifies registered listeners.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Guarantees
//!
//! | Property | How |
//! |----------|-----|
//! | Monotone status | transitions go through the packet store's table |
//! | Exactly-once execution | handler writes commit with the status change, atomically |
//! | Fraud safety | packets at or above the fraud height revert without their handler |
//! | Causal order | chains by id, packets by `(proof_height, sequence)` |
//! | Dispute window | only finalized state updates release packets |
//!
//! ## Module Structure
//!
//! ```text
//! hub-04-delayed-ack/
//! ├── domain/          # errors, lifecycle events, EndBlockReport
//! ├── ports/           # PacketFinalizerApi (in), handler + hooks (out)
//! ├── hooks.rs         # MultiDelayedAckHooks, BaseDelayedAckHook
//! ├── service.rs       # PacketFinalizer
//! ├── metrics.rs       # Prometheus counters (feature `metrics`)
//! └── config.rs        # DelayedAckParams
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod hooks;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports
pub use config::DelayedAckParams;
pub use domain::{
    DelayedAckError, DelayedAckEvent, EndBlockReport, HandlerError, HookError,
};
pub use hooks::{BaseDelayedAckHook, MultiDelayedAckHooks};
pub use ports::{DeferredPacketHandler, DelayedAckHooks, PacketFinalizerApi};
pub use service::PacketFinalizer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
