//! # Adapters
//!
//! Concrete implementations of the ports the hub subsystems depend on.

pub mod storage;
