//! # Ports Module
//!
//! - Inbound: what the finalizer offers the block executor.
//! - Outbound: the deferred handler and the listeners it calls into.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
