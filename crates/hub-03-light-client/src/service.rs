//! # Light-Client Verifier Service
//!
//! Compares origin-chain headers with the block descriptors of submitted
//! state updates and turns the result into trust decisions.

use crate::domain::{
    pending_prefix, ClientHeader, FraudReason, VerificationOutcome, VerifierError,
    PENDING_HEADER_PREFIX,
};
use crate::ports::LightClientVerifierApi;
use hub_02_state_updates::{StateUpdateLedger, StateUpdateLedgerApi};
use shared_types::{decode, encode, short_hex, Height, KeyValueStore, RollappId};
use tracing::{debug, warn};

/// Light-client verifier bound to a state-update ledger.
#[derive(Clone, Debug, Default)]
pub struct LightClientVerifier<L: StateUpdateLedgerApi = StateUpdateLedger> {
    ledger: L,
}

impl<L: StateUpdateLedgerApi> LightClientVerifier<L> {
    /// Create a verifier.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Ledger this verifier freezes chains through.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn freeze(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        reason: FraudReason,
    ) -> Result<VerificationOutcome, VerifierError> {
        self.ledger
            .mark_fraudulent(store, rollapp_id, reason.height())?;
        warn!(rollapp = %rollapp_id, %reason, "[hub-03] Fraud detected");
        Ok(VerificationOutcome::Fraudulent(reason))
    }

    /// Park a header until an update covers its height. Each chain holds at
    /// most `max_pending_headers`; beyond that new headers are dropped.
    fn queue(
        &self,
        store: &mut dyn KeyValueStore,
        header: ClientHeader,
    ) -> Result<VerificationOutcome, VerifierError> {
        let key = header.pending_key();
        if store.exists(&key)? {
            return Ok(VerificationOutcome::Unknown);
        }

        let queued = store.prefix_scan(&pending_prefix(&header.rollapp_id))?.len();
        if queued >= self.ledger.params().max_pending_headers {
            warn!(
                rollapp = %header.rollapp_id,
                height = header.height,
                queued,
                "[hub-03] Header queue full, header dropped"
            );
            return Ok(VerificationOutcome::Unknown);
        }

        store.put(&key, &encode(&header)?)?;
        debug!(
            rollapp = %header.rollapp_id,
            height = header.height,
            "[hub-03] No covering state update, header queued"
        );
        Ok(VerificationOutcome::Unknown)
    }
}

impl<L: StateUpdateLedgerApi> LightClientVerifierApi for LightClientVerifier<L> {
    fn verify(
        &self,
        store: &mut dyn KeyValueStore,
        header: ClientHeader,
    ) -> Result<VerificationOutcome, VerifierError> {
        let record = self.ledger.get_record(store, &header.rollapp_id)?;
        if record.frozen {
            debug!(
                rollapp = %header.rollapp_id,
                height = header.height,
                "[hub-03] Header for frozen rollapp ignored"
            );
            return Ok(VerificationOutcome::Unknown);
        }

        if record.precedes_first_update(header.height) {
            store.delete(&header.pending_key())?;
            debug!(
                rollapp = %header.rollapp_id,
                height = header.height,
                "[hub-03] Header below first state update dropped"
            );
            return Ok(VerificationOutcome::Unknown);
        }

        // Updates are contiguous: everything up to the latest end is covered.
        let claimed = match record.latest_height {
            Some(latest) if header.height <= latest => self
                .ledger
                .update_covering(store, &header.rollapp_id, header.height)?
                .and_then(|update| update.descriptor_at(header.height).map(|d| d.state_root)),
            _ => None,
        };

        let Some(claimed) = claimed else {
            return self.queue(store, header);
        };

        store.delete(&header.pending_key())?;
        if claimed == header.state_root {
            self.ledger
                .record_verified_height(store, &header.rollapp_id, header.height)?;
            debug!(
                rollapp = %header.rollapp_id,
                height = header.height,
                root = %short_hex(&claimed),
                "[hub-03] Header verified"
            );
            return Ok(VerificationOutcome::Valid);
        }

        self.freeze(
            store,
            &header.rollapp_id,
            FraudReason::StateRootMismatch {
                height: header.height,
                claimed,
                actual: header.state_root,
            },
        )
    }

    fn report_fraud(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
        description: String,
    ) -> Result<VerificationOutcome, VerifierError> {
        // Unknown chains are rejected before anything is written.
        self.ledger.get_record(store, rollapp_id)?;
        self.freeze(
            store,
            rollapp_id,
            FraudReason::Evidence {
                height,
                description,
            },
        )
    }

    fn reverify_pending(
        &self,
        store: &mut dyn KeyValueStore,
    ) -> Result<Vec<(ClientHeader, VerificationOutcome)>, VerifierError> {
        let mut decided = Vec::new();
        for header in self.pending_headers(store)? {
            if self.ledger.get_record(store, &header.rollapp_id)?.frozen {
                store.delete(&header.pending_key())?;
                continue;
            }
            let outcome = self.verify(store, header.clone())?;
            if outcome.is_decided() {
                decided.push((header, outcome));
            }
        }
        Ok(decided)
    }

    fn pending_headers(
        &self,
        store: &dyn KeyValueStore,
    ) -> Result<Vec<ClientHeader>, VerifierError> {
        let mut headers = store
            .prefix_scan(&[PENDING_HEADER_PREFIX])?
            .into_iter()
            .map(|(_, value)| decode::<ClientHeader>(&value).map_err(VerifierError::from))
            .collect::<Result<Vec<_>, _>>()?;
        headers.sort_by(|a, b| (&a.rollapp_id, a.height).cmp(&(&b.rollapp_id, b.height)));
        Ok(headers)
    }
}
