//! # State-Update Ledger Service
//!
//! [`StateUpdateLedgerApi`] over any [`KeyValueStore`].

use crate::config::LedgerParams;
use crate::domain::{
    invariant_contiguous, invariant_proof_covers_range, record_key, update_key, update_prefix,
    LedgerError, LightClientRecord, Result, StateUpdate, StateUpdateProof, TrustStatus,
    RECORD_PREFIX,
};
use crate::ports::StateUpdateLedgerApi;
use shared_types::{
    decode, encode, BatchOperation, Height, KeyValueStore, RollappId, Timestamp,
};
use tracing::{debug, info, warn};

/// Per-chain ledger of state updates and light-client records.
#[derive(Clone, Debug, Default)]
pub struct StateUpdateLedger {
    params: LedgerParams,
}

impl StateUpdateLedger {
    /// Create a ledger with the given parameters.
    pub fn new(params: LedgerParams) -> Self {
        Self { params }
    }

    fn write_updates(
        &self,
        store: &mut dyn KeyValueStore,
        updates: &[StateUpdate],
        record: &LightClientRecord,
    ) -> Result<()> {
        let mut batch = Vec::with_capacity(updates.len() + 1);
        for update in updates {
            batch.push(BatchOperation::put(update.store_key(), encode(update)?));
        }
        batch.push(BatchOperation::put(record.store_key(), encode(record)?));
        store.atomic_batch_write(batch)?;
        Ok(())
    }
}

impl StateUpdateLedgerApi for StateUpdateLedger {
    fn params(&self) -> &LedgerParams {
        &self.params
    }

    fn register_rollapp(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: RollappId,
    ) -> Result<LightClientRecord> {
        if !rollapp_id.is_valid() {
            return Err(LedgerError::InvalidRollappId {
                len: rollapp_id.as_str().len(),
            });
        }
        let key = record_key(&rollapp_id);
        if store.exists(&key)? {
            return Err(LedgerError::RollappAlreadyRegistered(rollapp_id));
        }
        let record = LightClientRecord::new(rollapp_id);
        store.put(&key, &encode(&record)?)?;
        info!(rollapp = %record.rollapp_id, "[hub-02] Rollapp registered");
        Ok(record)
    }

    fn get_record(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
    ) -> Result<LightClientRecord> {
        match store.get(&record_key(rollapp_id))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Err(LedgerError::UnknownRollapp(rollapp_id.clone())),
        }
    }

    fn list_records(&self, store: &dyn KeyValueStore) -> Result<Vec<LightClientRecord>> {
        let mut records = store
            .prefix_scan(&[RECORD_PREFIX])?
            .into_iter()
            .map(|(_, value)| decode::<LightClientRecord>(&value).map_err(LedgerError::from))
            .collect::<Result<Vec<_>>>()?;
        // Key order is length-prefixed; chains are walked by identifier.
        records.sort_by(|a, b| a.rollapp_id.cmp(&b.rollapp_id));
        Ok(records)
    }

    fn check_admission(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
    ) -> Result<LightClientRecord> {
        let record = self.get_record(store, rollapp_id)?;
        if record.frozen {
            return Err(LedgerError::ChainFrozen(rollapp_id.clone()));
        }
        Ok(record)
    }

    fn submit(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        start: Height,
        end: Height,
        proof: StateUpdateProof,
        now: Timestamp,
    ) -> Result<StateUpdate> {
        let mut record = self.check_admission(store, rollapp_id)?;
        invariant_contiguous(record.latest_height, start, end)?;
        invariant_proof_covers_range(&proof, start, end)?;

        let update = StateUpdate {
            rollapp_id: rollapp_id.clone(),
            index: record.next_update_index,
            start_height: start,
            end_height: end,
            trust_status: TrustStatus::Unverified,
            submission_time: now,
            block_descriptors: proof.block_descriptors,
        };
        record.next_update_index += 1;
        record.latest_height = Some(end);
        record.first_height.get_or_insert(start);

        self.write_updates(store, std::slice::from_ref(&update), &record)?;
        info!(
            rollapp = %rollapp_id,
            index = update.index,
            start,
            end,
            "[hub-02] State update submitted"
        );
        Ok(update)
    }

    fn check_packet_admission(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        proof_height: Height,
    ) -> Result<LightClientRecord> {
        let record = self.check_admission(store, rollapp_id)?;
        if record.precedes_first_update(proof_height) {
            return Err(LedgerError::HeightBeforeFirstUpdate {
                rollapp_id: rollapp_id.clone(),
                height: proof_height,
                first_height: record.first_height.unwrap_or(1),
            });
        }
        Ok(record)
    }

    fn get_update(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        index: u64,
    ) -> Result<StateUpdate> {
        match store.get(&update_key(rollapp_id, index))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Err(LedgerError::UpdateNotFound {
                rollapp_id: rollapp_id.clone(),
                index,
            }),
        }
    }

    fn list_updates(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
    ) -> Result<Vec<StateUpdate>> {
        store
            .prefix_scan(&update_prefix(rollapp_id))?
            .into_iter()
            .map(|(_, value)| decode::<StateUpdate>(&value).map_err(LedgerError::from))
            .collect()
    }

    fn update_covering(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
    ) -> Result<Option<StateUpdate>> {
        Ok(self
            .list_updates(store, rollapp_id)?
            .into_iter()
            .find(|update| update.covers(height)))
    }

    fn dispute_window_elapsed(&self, update: &StateUpdate, now: Timestamp) -> bool {
        update.trust_status == TrustStatus::Unverified
            && now.saturating_sub(update.submission_time) >= self.params.dispute_period_secs
    }

    fn mark_finalized(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        up_to_height: Height,
    ) -> Result<Vec<StateUpdate>> {
        let mut record = self.get_record(store, rollapp_id)?;
        let mut changed = Vec::new();

        for mut update in self.list_updates(store, rollapp_id)? {
            if update.end_height > up_to_height
                || update.trust_status == TrustStatus::Fraudulent
            {
                break;
            }
            if update.trust_status == TrustStatus::Finalized {
                continue;
            }
            update.trust_status = TrustStatus::Finalized;
            record.finalized_height = record.finalized_height.max(update.end_height);
            changed.push(update);
        }

        if !changed.is_empty() {
            self.write_updates(store, &changed, &record)?;
            debug!(
                rollapp = %rollapp_id,
                count = changed.len(),
                finalized_height = record.finalized_height,
                "[hub-02] State updates finalized"
            );
        }
        Ok(changed)
    }

    fn finalize_elapsed(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        now: Timestamp,
    ) -> Result<Vec<StateUpdate>> {
        let mut up_to = None;
        for update in self.list_updates(store, rollapp_id)? {
            match update.trust_status {
                TrustStatus::Finalized => continue,
                TrustStatus::Fraudulent => break,
                TrustStatus::Unverified => {
                    if !self.dispute_window_elapsed(&update, now) {
                        break;
                    }
                    up_to = Some(update.end_height);
                }
            }
        }

        match up_to {
            Some(height) => self.mark_finalized(store, rollapp_id, height),
            None => Ok(Vec::new()),
        }
    }

    fn mark_fraudulent(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        at_height: Height,
    ) -> Result<Vec<StateUpdate>> {
        let mut record = self.get_record(store, rollapp_id)?;

        // Finalized heights are settled; fraud can only reach above them.
        let mut fraud_height = at_height.max(record.finalized_height.saturating_add(1));
        if let Some(existing) = record.fraud_height {
            fraud_height = fraud_height.min(existing);
        }

        let changed: Vec<StateUpdate> = self
            .list_updates(store, rollapp_id)?
            .into_iter()
            .filter(|update| {
                update.trust_status == TrustStatus::Unverified
                    && update.end_height >= fraud_height
            })
            .map(|mut update| {
                update.trust_status = TrustStatus::Fraudulent;
                update
            })
            .collect();

        let newly_frozen = !record.frozen;
        record.frozen = true;
        record.fraud_height = Some(fraud_height);
        self.write_updates(store, &changed, &record)?;

        if newly_frozen {
            warn!(
                rollapp = %rollapp_id,
                fraud_height,
                fraudulent_updates = changed.len(),
                "[hub-02] Fraud recorded, rollapp frozen"
            );
        }
        Ok(changed)
    }

    fn record_verified_height(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
    ) -> Result<LightClientRecord> {
        let mut record = self.get_record(store, rollapp_id)?;
        if height > record.last_verified_height {
            record.last_verified_height = height;
            store.put(&record.store_key(), &encode(&record)?)?;
        }
        Ok(record)
    }
}
