//! # Inbound Ports
//!
//! API trait defining what the Light-Client Verifier can do.

use crate::domain::{ClientHeader, VerificationOutcome, VerifierError};
use shared_types::{Height, KeyValueStore, RollappId};

/// Light-Client Verifier API - inbound port.
pub trait LightClientVerifierApi {
    /// Check `header` against the state submitted for its height.
    ///
    /// `Fraudulent` freezes the chain before returning. `Unknown` queues the
    /// header for re-verification.
    fn verify(
        &self,
        store: &mut dyn KeyValueStore,
        header: ClientHeader,
    ) -> Result<VerificationOutcome, VerifierError>;

    /// Accept an already-validated fraud proof for `height`.
    fn report_fraud(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
        description: String,
    ) -> Result<VerificationOutcome, VerifierError>;

    /// Re-verify queued headers in `(rollapp, height)` order. Returns the
    /// headers that reached a decision.
    fn reverify_pending(
        &self,
        store: &mut dyn KeyValueStore,
    ) -> Result<Vec<(ClientHeader, VerificationOutcome)>, VerifierError>;

    /// Headers still waiting for a covering state update.
    fn pending_headers(&self, store: &dyn KeyValueStore)
        -> Result<Vec<ClientHeader>, VerifierError>;
}
