//! # HUB-03 Light-Client Verifier
//!
//! Bridges header checks to trust decisions consumed by the delayed-ack
//! finalizer.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Outcomes
//!
//! | Outcome | Meaning | Side effect |
//! |---------|---------|-------------|
//! | `Valid` | header root equals the submitted descriptor | `last_verified_height` advances |
//! | `Fraudulent` | roots differ, or a fraud proof was accepted | chain frozen immediately |
//! | `Unknown` | no covering state update yet | header queued for re-verification |
//!
//! Header cryptography happens before headers reach this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    ClientHeader, FraudReason, VerificationOutcome, VerifierError, PENDING_HEADER_PREFIX,
};
pub use ports::LightClientVerifierApi;
pub use service::LightClientVerifier;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
