//! # Ports Module
//!
//! Inbound API of the Packet Store. Persistence goes through
//! [`shared_types::KeyValueStore`].

pub mod inbound;

pub use inbound::*;
