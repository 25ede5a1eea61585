//! # Ports Module
//!
//! Inbound API of the Light-Client Verifier.

pub mod inbound;

pub use inbound::*;
