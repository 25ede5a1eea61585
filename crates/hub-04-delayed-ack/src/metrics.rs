//! # Delayed-Ack Metrics
//!
//! Prometheus counters for the packet lifecycle.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! hub-04-delayed-ack = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `delayedack_packets_finalized_total` - Finalized packets (by outcome)
//! - `delayedack_packets_reverted_total` - Reverted packets
//! - `delayedack_transitions_deferred_total` - Transitions pushed to a later block
//! - `delayedack_revert_hook_failures_total` - Hook failures on committed reverts
//! - `delayedack_packets_pruned_total` - Pruned packets
//! - `delayedack_state_updates_finalized_total` - Finalized state updates
//! - `delayedack_chains_frozen_total` - Chains frozen during a pass

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Finalized packets, labeled by outcome
    pub static ref PACKETS_FINALIZED: IntCounterVec = register_int_counter_vec!(
        "delayedack_packets_finalized_total",
        "Total number of packets finalized",
        &["outcome"]
    )
    .expect("Failed to create PACKETS_FINALIZED metric");

    /// Reverted packets
    pub static ref PACKETS_REVERTED: IntCounter = register_int_counter!(
        "delayedack_packets_reverted_total",
        "Total number of packets reverted"
    )
    .expect("Failed to create PACKETS_REVERTED metric");

    /// Deferred transitions
    pub static ref TRANSITIONS_DEFERRED: IntCounter = register_int_counter!(
        "delayedack_transitions_deferred_total",
        "Total number of packet transitions deferred to a later block"
    )
    .expect("Failed to create TRANSITIONS_DEFERRED metric");

    /// Hook failures on reverts
    pub static ref REVERT_HOOK_FAILURES: IntCounter = register_int_counter!(
        "delayedack_revert_hook_failures_total",
        "Total number of hook failures on committed reverts"
    )
    .expect("Failed to create REVERT_HOOK_FAILURES metric");

    /// Pruned packets
    pub static ref PACKETS_PRUNED: IntCounter = register_int_counter!(
        "delayedack_packets_pruned_total",
        "Total number of terminal packets pruned"
    )
    .expect("Failed to create PACKETS_PRUNED metric");

    /// Finalized state updates
    pub static ref STATE_UPDATES_FINALIZED: IntCounter = register_int_counter!(
        "delayedack_state_updates_finalized_total",
        "Total number of state updates finalized"
    )
    .expect("Failed to create STATE_UPDATES_FINALIZED metric");

    /// Frozen chains
    pub static ref CHAINS_FROZEN: IntCounter = register_int_counter!(
        "delayedack_chains_frozen_total",
        "Total number of chains frozen by re-verification"
    )
    .expect("Failed to create CHAINS_FROZEN metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a finalized packet
#[cfg(feature = "metrics")]
pub fn record_packet_finalized(success: bool) {
    let outcome = if success { "success" } else { "error_ack" };
    PACKETS_FINALIZED.with_label_values(&[outcome]).inc();
}

/// Record a reverted packet
#[cfg(feature = "metrics")]
pub fn record_packet_reverted() {
    PACKETS_REVERTED.inc();
}

/// Record a deferred transition
#[cfg(feature = "metrics")]
pub fn record_transition_deferred() {
    TRANSITIONS_DEFERRED.inc();
}

/// Record a hook failure on a revert
#[cfg(feature = "metrics")]
pub fn record_revert_hook_failed() {
    REVERT_HOOK_FAILURES.inc();
}

/// Record a pruned packet
#[cfg(feature = "metrics")]
pub fn record_packet_pruned() {
    PACKETS_PRUNED.inc();
}

/// Record finalized state updates
#[cfg(feature = "metrics")]
pub fn record_state_updates_finalized(count: u64) {
    STATE_UPDATES_FINALIZED.inc_by(count);
}

/// Record a frozen chain
#[cfg(feature = "metrics")]
pub fn record_chain_frozen() {
    CHAINS_FROZEN.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_packet_finalized(_success: bool) {}

#[cfg(not(feature = "metrics"))]
pub fn record_packet_reverted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_transition_deferred() {}

#[cfg(not(feature = "metrics"))]
pub fn record_revert_hook_failed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_packet_pruned() {}

#[cfg(not(feature = "metrics"))]
pub fn record_state_updates_finalized(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_chain_frozen() {}
