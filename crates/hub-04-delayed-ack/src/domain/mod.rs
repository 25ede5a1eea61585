//! # Domain Module
//!
//! Errors and lifecycle events of the delayed-ack finalizer.

pub mod errors;
pub mod events;

pub use errors::*;
pub use events::*;
