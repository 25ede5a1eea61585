//! # Domain Value Objects
//!
//! Verification outcomes.

use serde::{Deserialize, Serialize};
use shared_types::{short_hex, Hash, Height};
use std::fmt;

/// Why a header proved a state update fraudulent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FraudReason {
    /// Header state root differs from the submitted block descriptor.
    StateRootMismatch {
        /// Origin-chain height
        height: Height,
        /// Root claimed by the state update
        claimed: Hash,
        /// Root committed by the header
        actual: Hash,
    },
    /// Fraud proof accepted by the admission layer.
    Evidence {
        /// Origin-chain height the proof targets
        height: Height,
        /// Description carried with the proof
        description: String,
    },
}

impl FraudReason {
    /// Origin-chain height the fraud was found at.
    pub fn height(&self) -> Height {
        match self {
            FraudReason::StateRootMismatch { height, .. } => *height,
            FraudReason::Evidence { height, .. } => *height,
        }
    }
}

impl fmt::Display for FraudReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FraudReason::StateRootMismatch {
                height,
                claimed,
                actual,
            } => write!(
                f,
                "state root mismatch at {}: claimed {}, header {}",
                height,
                short_hex(claimed),
                short_hex(actual)
            ),
            FraudReason::Evidence {
                height,
                description,
            } => write!(f, "fraud evidence at {}: {}", height, description),
        }
    }
}

/// Result of verifying a header against submitted state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    /// Header matches the submitted state.
    Valid,
    /// Submitted state is fraudulent; the chain has been frozen.
    Fraudulent(FraudReason),
    /// Not enough information yet. No decision, never implicit validity.
    Unknown,
}

impl VerificationOutcome {
    /// Whether a decision was reached.
    pub fn is_decided(&self) -> bool {
        !matches!(self, VerificationOutcome::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_not_decided() {
        assert!(!VerificationOutcome::Unknown.is_decided());
        assert!(VerificationOutcome::Valid.is_decided());
    }

    #[test]
    fn test_fraud_reason_display() {
        let reason = FraudReason::StateRootMismatch {
            height: 110,
            claimed: [0xAA; 32],
            actual: [0xBB; 32],
        };
        assert_eq!(reason.height(), 110);
        assert_eq!(
            reason.to_string(),
            "state root mismatch at 110: claimed aaaaaaaa, header bbbbbbbb"
        );
    }
}
