//! # Ledger Configuration
//!
//! Chain-level parameters of the State-Update Ledger.

use crate::domain::LedgerError;
use serde::{Deserialize, Serialize};
use shared_types::SECS_PER_DAY;

/// Default dispute period: seven days.
pub const DEFAULT_DISPUTE_PERIOD_SECS: u64 = 7 * SECS_PER_DAY;

/// Default cap on queued headers per rollapp.
pub const DEFAULT_MAX_PENDING_HEADERS: usize = 256;

/// State-update ledger parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Seconds of hub time an update stays challengeable after submission.
    pub dispute_period_secs: u64,
    /// Most headers queued per rollapp while waiting for a covering update.
    pub max_pending_headers: usize,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            dispute_period_secs: DEFAULT_DISPUTE_PERIOD_SECS,
            max_pending_headers: DEFAULT_MAX_PENDING_HEADERS,
        }
    }
}

impl LedgerParams {
    /// Create a config for testing (short dispute period).
    pub fn for_testing() -> Self {
        Self {
            dispute_period_secs: 100,
            max_pending_headers: 4,
        }
    }

    /// Reject unusable parameters.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.dispute_period_secs == 0 {
            return Err(LedgerError::InvalidParams(
                "dispute_period_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
