//! # Delayed-Ack Configuration
//!
//! Pruning parameters of the finalizer.

use crate::domain::DelayedAckError;
use serde::{Deserialize, Serialize};
use shared_types::SECS_PER_DAY;

/// Finalizer parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedAckParams {
    /// Seconds of hub time a terminal packet is kept before pruning,
    /// measured from its last status change.
    pub prune_after_secs: u64,

    /// Upper bound on packets pruned per block (0 = no limit).
    pub max_prune_per_block: usize,
}

impl Default for DelayedAckParams {
    fn default() -> Self {
        Self {
            prune_after_secs: SECS_PER_DAY,
            max_prune_per_block: 1000,
        }
    }
}

impl DelayedAckParams {
    /// Create a config for testing (prune quickly, no per-block cap).
    pub fn for_testing() -> Self {
        Self {
            prune_after_secs: 10,
            max_prune_per_block: 0,
        }
    }

    /// Reject unusable parameters.
    ///
    /// Retention must fit the hub clock: `prune_after_secs` above
    /// `i64::MAX` can never elapse.
    pub fn validate(&self) -> Result<(), DelayedAckError> {
        if self.prune_after_secs > i64::MAX as u64 {
            return Err(DelayedAckError::InvalidParams(format!(
                "prune_after_secs {} never elapses",
                self.prune_after_secs
            )));
        }
        Ok(())
    }

    /// Prune limit as an `Option` (`None` = unlimited).
    pub fn prune_limit(&self) -> Option<usize> {
        (self.max_prune_per_block > 0).then_some(self.max_prune_per_block)
    }
}
