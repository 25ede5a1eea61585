//! # Settlement Hub Test Suite
//!
//! Cross-subsystem tests driving the assembled hub end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Recording handler, flaky listener, proof builders
//!     ├── scenarios.rs    # Dispute window, fraud revert, listener failure
//!     └── properties.rs   # Ordering, fraud-safety and monotonicity properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p hub-tests
//!
//! # By category
//! cargo test -p hub-tests integration::scenarios
//! cargo test -p hub-tests integration::properties
//!
//! # Benchmarks
//! cargo bench -p hub-tests
//! ```

#![allow(dead_code)]

pub mod integration;
