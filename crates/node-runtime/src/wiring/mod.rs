//! # Wiring
//!
//! Routes external hub inputs into the assembled application.

pub mod scenario;

pub use scenario::{
    canonical_state_root, parse_step, replay, ScenarioError, ScenarioStep, ScenarioSummary,
};
