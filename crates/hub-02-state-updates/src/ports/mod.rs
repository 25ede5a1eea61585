//! # Ports Module
//!
//! Inbound API of the State-Update Ledger. Persistence goes through
//! [`shared_types::KeyValueStore`].

pub mod inbound;

pub use inbound::*;
