//! # Packet Finalizer Service
//!
//! The per-block driver of the packet lifecycle.
//!
//! ## Pass Layout
//!
//! ```text
//! end_block(store, block)
//!   ├── re-verify queued headers            (fraud freezes chains first)
//!   ├── for each rollapp, ascending id:
//!   │     ├── finalize elapsed state updates
//!   │     └── for each pending packet, ascending (height, sequence):
//!   │           height >= fraud_height     → revert  (handler never runs)
//!   │           first_height <= height <= finalized_height → finalize
//!   └── prune expired terminal packets      (after_packet_deleted, then prune)
//! ```
//!
//! ## Units of Work
//!
//! Every packet transition runs inside a [`StoreOverlay`] over the block's
//! store. A finalization commits handler writes, the status change and hook
//! writes together with one atomic batch, or nothing at all. A revert always
//! commits its status change; hook writes are kept only if every hook
//! succeeded.

use crate::config::DelayedAckParams;
use crate::domain::{DelayedAckError, DelayedAckEvent, EndBlockReport, HookError, Result};
use crate::hooks::MultiDelayedAckHooks;
use crate::metrics;
use crate::ports::{DeferredPacketHandler, DelayedAckHooks, PacketFinalizerApi};
use hub_01_packet_store::{
    Acknowledgement, PacketKey, PacketStatus, PacketStore, PacketStoreApi, PacketStoreError,
    RollappPacket,
};
use hub_02_state_updates::{LightClientRecord, StateUpdateLedger, StateUpdateLedgerApi};
use hub_03_light_client::{LightClientVerifier, LightClientVerifierApi, VerificationOutcome};
use shared_types::{BlockContext, KeyValueStore, StoreOverlay};
use tracing::{debug, info, warn};

/// Why a finalization unit did not commit.
enum UnitFailure {
    /// Retry next block.
    Deferred(String),
    /// The store failed; the whole pass fails.
    Fatal(DelayedAckError),
}

impl From<PacketStoreError> for UnitFailure {
    fn from(e: PacketStoreError) -> Self {
        UnitFailure::Fatal(e.into())
    }
}

impl From<HookError> for UnitFailure {
    fn from(e: HookError) -> Self {
        UnitFailure::Deferred(e.to_string())
    }
}

/// Delayed-ack packet finalizer.
pub struct PacketFinalizer<H: DeferredPacketHandler> {
    params: DelayedAckParams,
    packets: PacketStore,
    verifier: LightClientVerifier,
    handler: H,
    hooks: MultiDelayedAckHooks,
}

impl<H: DeferredPacketHandler> PacketFinalizer<H> {
    /// Assemble a finalizer. The hook list is fixed from here on.
    pub fn new(
        params: DelayedAckParams,
        verifier: LightClientVerifier,
        handler: H,
        hooks: MultiDelayedAckHooks,
    ) -> Self {
        Self {
            params,
            packets: PacketStore::new(),
            verifier,
            handler,
            hooks,
        }
    }

    /// Finalizer parameters.
    pub fn params(&self) -> &DelayedAckParams {
        &self.params
    }

    /// Packet store the finalizer advances.
    pub fn packets(&self) -> &PacketStore {
        &self.packets
    }

    /// Verifier consulted at the start of every pass.
    pub fn verifier(&self) -> &LightClientVerifier {
        &self.verifier
    }

    /// State-update ledger.
    pub fn ledger(&self) -> &StateUpdateLedger {
        self.verifier.ledger()
    }

    /// Deferred packet handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Registered listeners.
    pub fn hooks(&self) -> &MultiDelayedAckHooks {
        &self.hooks
    }

    fn reverify_headers(
        &self,
        store: &mut dyn KeyValueStore,
        report: &mut EndBlockReport,
    ) -> Result<()> {
        for (header, outcome) in self.verifier.reverify_pending(store)? {
            if let VerificationOutcome::Fraudulent(reason) = outcome {
                let record = self.ledger().get_record(store, &header.rollapp_id)?;
                metrics::record_chain_frozen();
                report.push(DelayedAckEvent::ChainFrozen {
                    rollapp_id: header.rollapp_id,
                    fraud_height: record.fraud_height.unwrap_or(header.height),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }

    fn process_rollapp(
        &self,
        store: &mut dyn KeyValueStore,
        record: &LightClientRecord,
        block: BlockContext,
        report: &mut EndBlockReport,
    ) -> Result<()> {
        let rollapp_id = &record.rollapp_id;

        let finalized = self
            .ledger()
            .finalize_elapsed(store, rollapp_id, block.time)?;
        if !finalized.is_empty() {
            metrics::record_state_updates_finalized(finalized.len() as u64);
        }
        for update in finalized {
            info!(
                rollapp = %rollapp_id,
                index = update.index,
                start = update.start_height,
                end = update.end_height,
                "[hub-04] State update finalized"
            );
            report.push(DelayedAckEvent::StateUpdateFinalized {
                rollapp_id: update.rollapp_id,
                index: update.index,
                start_height: update.start_height,
                end_height: update.end_height,
            });
        }

        let record = self.ledger().get_record(store, rollapp_id)?;
        let pending = self.packets.list_pending(store, rollapp_id, u64::MAX)?;

        for packet in pending {
            match record.fraud_height {
                Some(fraud_height) if packet.proof_height >= fraud_height => {
                    self.revert_packet(store, packet, block, report)?;
                }
                // Only heights a finalized update attests; nothing below
                // the chain's first update ever is.
                _ if record.is_finalized_height(packet.proof_height) => {
                    self.finalize_packet(store, packet, block, report)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handler, outcome, status change and hooks of one packet, buffered in
    /// `unit`. Returns the finalized key and whether the handler succeeded.
    fn finalize_unit(
        &self,
        unit: &mut StoreOverlay<'_>,
        packet: &RollappPacket,
        block: BlockContext,
    ) -> std::result::Result<(PacketKey, bool), UnitFailure> {
        let key = packet.key();

        // The handler writes into its own layer so a failed call leaves nothing.
        let handled = {
            let mut scratch = StoreOverlay::new(&*unit);
            self.handler
                .handle_finalized_packet(&mut scratch, packet.packet_type, &packet.data)
                .map(|ack| (ack, scratch.into_batch()))
        };

        let (ack, error) = match handled {
            Ok((ack, writes)) => {
                unit.absorb(writes);
                (ack, None)
            }
            Err(e) if e.is_application_error() => {
                warn!(key = %key, error = %e, "[hub-04] Packet handler failed, recording error acknowledgement");
                (Acknowledgement::Error(e.to_string()), Some(e.to_string()))
            }
            Err(e) => return Err(UnitFailure::Deferred(e.to_string())),
        };
        let success = error.is_none();

        self.packets.record_outcome(unit, &key, ack, error)?;
        let (updated, new_key) =
            self.packets
                .update_status(unit, &key, PacketStatus::Finalized, block.time)?;
        self.hooks
            .after_packet_status_updated(unit, &updated, &key, &new_key)?;

        Ok((new_key, success))
    }

    fn finalize_packet(
        &self,
        store: &mut dyn KeyValueStore,
        packet: RollappPacket,
        block: BlockContext,
        report: &mut EndBlockReport,
    ) -> Result<()> {
        let key = packet.key();
        let outcome = {
            let mut unit = StoreOverlay::new(&*store);
            self.finalize_unit(&mut unit, &packet, block)
                .map(|(new_key, success)| (new_key, success, unit.into_batch()))
        };

        match outcome {
            Ok((new_key, success, writes)) => {
                store.atomic_batch_write(writes)?;
                metrics::record_packet_finalized(success);
                debug!(key = %new_key, success, "[hub-04] Packet finalized");
                report.push(DelayedAckEvent::PacketFinalized {
                    key: new_key,
                    success,
                });
            }
            Err(UnitFailure::Deferred(reason)) => {
                metrics::record_transition_deferred();
                warn!(key = %key, %reason, "[hub-04] Packet finalization deferred to next block");
                report.push(DelayedAckEvent::TransitionDeferred { key, reason });
            }
            Err(UnitFailure::Fatal(e)) => return Err(e),
        }
        Ok(())
    }

    fn revert_packet(
        &self,
        store: &mut dyn KeyValueStore,
        packet: RollappPacket,
        block: BlockContext,
        report: &mut EndBlockReport,
    ) -> Result<()> {
        let key = packet.key();
        let (new_key, hook_failure, writes) = {
            let mut unit = StoreOverlay::new(&*store);
            let (updated, new_key) =
                self.packets
                    .update_status(&mut unit, &key, PacketStatus::Reverted, block.time)?;

            let (hooked, hook_writes) = {
                let mut hook_unit = StoreOverlay::new(&unit);
                let result = self.hooks.after_packet_status_updated(
                    &mut hook_unit,
                    &updated,
                    &key,
                    &new_key,
                );
                (result, hook_unit.into_batch())
            };

            let hook_failure = match hooked {
                Ok(()) => {
                    unit.absorb(hook_writes);
                    None
                }
                Err(e) => Some(e.to_string()),
            };
            (new_key, hook_failure, unit.into_batch())
        };

        store.atomic_batch_write(writes)?;
        metrics::record_packet_reverted();
        debug!(key = %new_key, "[hub-04] Packet reverted");
        report.push(DelayedAckEvent::PacketReverted {
            key: new_key.clone(),
        });

        if let Some(reason) = hook_failure {
            metrics::record_revert_hook_failed();
            warn!(key = %new_key, %reason, "[hub-04] Hook failed on revert, revert kept");
            report.push(DelayedAckEvent::RevertHookFailed {
                key: new_key,
                reason,
            });
        }
        Ok(())
    }

    fn prune_expired(
        &self,
        store: &mut dyn KeyValueStore,
        block: BlockContext,
        report: &mut EndBlockReport,
    ) -> Result<()> {
        let limit = self.params.prune_limit().unwrap_or(usize::MAX);
        let mut pruned = 0;

        for status in [PacketStatus::Finalized, PacketStatus::Reverted] {
            for packet in self.packets.list_by_status(store, status)? {
                if pruned >= limit {
                    return Ok(());
                }
                let terminal_at = packet.status_updated_at.unwrap_or(packet.received_at);
                if block.time.saturating_sub(terminal_at) < self.params.prune_after_secs {
                    continue;
                }

                let key = packet.key();
                let writes = {
                    let mut unit = StoreOverlay::new(&*store);
                    self.hooks.after_packet_deleted(&mut unit, &packet);
                    self.packets.prune(&mut unit, &key)?;
                    unit.into_batch()
                };
                store.atomic_batch_write(writes)?;

                pruned += 1;
                metrics::record_packet_pruned();
                debug!(key = %key, "[hub-04] Packet pruned");
                report.push(DelayedAckEvent::PacketPruned { key });
            }
        }
        Ok(())
    }
}

impl<H: DeferredPacketHandler> PacketFinalizerApi for PacketFinalizer<H> {
    fn end_block(
        &self,
        store: &mut dyn KeyValueStore,
        block: BlockContext,
    ) -> Result<EndBlockReport> {
        let mut report = EndBlockReport::new(block);

        self.reverify_headers(store, &mut report)?;

        for record in self.ledger().list_records(store)? {
            self.process_rollapp(store, &record, block, &mut report)?;
        }

        self.prune_expired(store, block, &mut report)?;

        info!(
            height = block.height,
            finalized = report.finalized,
            reverted = report.reverted,
            deferred = report.deferred,
            pruned = report.pruned,
            "[hub-04] End block processed"
        );
        Ok(report)
    }
}

impl<H: DeferredPacketHandler> std::fmt::Debug for PacketFinalizer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketFinalizer")
            .field("params", &self.params)
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HandlerError;
    use crate::hooks::BaseDelayedAckHook;
    use hub_01_packet_store::PacketType;
    use hub_02_state_updates::{
        BlockDescriptor, LedgerParams, StateUpdateProof, TrustStatus,
    };
    use hub_03_light_client::ClientHeader;
    use shared_types::{Height, InMemoryKVStore, RollappId, SECS_PER_DAY};
    use std::sync::{Arc, Mutex};

    const SEVEN_DAYS: u64 = 7 * SECS_PER_DAY;

    type Calls = Arc<Mutex<Vec<Vec<u8>>>>;

    /// Handler that records calls, writes a marker per packet and fails on
    /// payloads starting with `0xFF`.
    #[derive(Clone, Default)]
    struct CountingHandler {
        calls: Calls,
    }

    impl DeferredPacketHandler for CountingHandler {
        fn handle_finalized_packet(
            &self,
            store: &mut dyn KeyValueStore,
            _packet_type: PacketType,
            data: &[u8],
        ) -> std::result::Result<Acknowledgement, HandlerError> {
            self.calls.lock().unwrap().push(data.to_vec());
            let mut marker = b"app/".to_vec();
            marker.extend_from_slice(data);
            store.put(&marker, b"done")?;
            if data.first() == Some(&0xFF) {
                return Err(HandlerError::Rejected("refused".into()));
            }
            Ok(Acknowledgement::Success(vec![1]))
        }
    }

    /// Hook that fails while `failing` is set and writes a marker otherwise.
    struct FlakyHook {
        failing: Arc<Mutex<bool>>,
    }

    impl DelayedAckHooks for FlakyHook {
        fn name(&self) -> &str {
            "flaky"
        }

        fn after_packet_status_updated(
            &self,
            store: &mut dyn KeyValueStore,
            _packet: &RollappPacket,
            _old_key: &PacketKey,
            new_key: &PacketKey,
        ) -> std::result::Result<(), HookError> {
            store.put(format!("hook/{}", new_key).as_bytes(), b"1")?;
            if *self.failing.lock().unwrap() {
                return Err(HookError::failed("flaky", "not now"));
            }
            Ok(())
        }
    }

    /// Hook recording deletions and whether the packet was still stored
    /// when it ran. A `broken` one logs and writes nothing.
    struct DeleteRecorder {
        name: &'static str,
        broken: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl DelayedAckHooks for DeleteRecorder {
        fn name(&self) -> &str {
            self.name
        }

        fn after_packet_deleted(&self, store: &mut dyn KeyValueStore, packet: &RollappPacket) {
            let stored = matches!(store.exists(&packet.key().to_bytes()), Ok(true));
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", self.name, packet.sequence, stored));
            if self.broken {
                warn!(hook = self.name, "cleanup failed");
                return;
            }
            let marker = format!("deleted/{}/{}", self.name, packet.sequence);
            if let Err(e) = store.put(marker.as_bytes(), b"1") {
                warn!(error = %e, "cleanup write failed");
            }
        }
    }

    fn rollapp() -> RollappId {
        RollappId::new("rollapp_1")
    }

    fn root(height: Height) -> [u8; 32] {
        shared_types::sha256(&height.to_be_bytes())
    }

    fn proof(start: Height, end: Height) -> StateUpdateProof {
        StateUpdateProof::new(
            (start..=end)
                .map(|h| BlockDescriptor::new(h, root(h), h))
                .collect(),
        )
    }

    fn finalizer(
        hooks: MultiDelayedAckHooks,
        params: DelayedAckParams,
    ) -> (PacketFinalizer<CountingHandler>, Calls) {
        let handler = CountingHandler::default();
        let calls = Arc::clone(&handler.calls);
        let verifier = LightClientVerifier::new(StateUpdateLedger::new(LedgerParams::default()));
        (PacketFinalizer::new(params, verifier, handler, hooks), calls)
    }

    fn setup(
        hooks: MultiDelayedAckHooks,
    ) -> (InMemoryKVStore, PacketFinalizer<CountingHandler>, Calls) {
        let mut store = InMemoryKVStore::new();
        let (finalizer, calls) = finalizer(
            hooks,
            DelayedAckParams {
                prune_after_secs: u64::MAX / 2,
                max_prune_per_block: 0,
            },
        );
        finalizer
            .ledger()
            .register_rollapp(&mut store, rollapp())
            .unwrap();
        finalizer
            .ledger()
            .submit(&mut store, &rollapp(), 100, 150, proof(100, 150), 0)
            .unwrap();
        (store, finalizer, calls)
    }

    fn enqueue(
        store: &mut InMemoryKVStore,
        finalizer: &PacketFinalizer<CountingHandler>,
        height: Height,
        sequence: u64,
        data: Vec<u8>,
    ) -> PacketKey {
        let packet = RollappPacket::new(rollapp(), PacketType::OnRecv, height, sequence, data);
        finalizer.packets().enqueue(store, packet).unwrap()
    }

    #[test]
    fn test_dispute_window_respected() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        let key = enqueue(&mut store, &finalizer, 120, 1, vec![1]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(1, 6 * SECS_PER_DAY))
            .unwrap();
        assert!(report.is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            finalizer.packets().get(&store, &key).unwrap().status,
            PacketStatus::Pending
        );
    }

    #[test]
    fn test_finalizes_after_window_exactly_once() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        let key = enqueue(&mut store, &finalizer, 120, 1, vec![1]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS + 1))
            .unwrap();
        assert!(matches!(
            report.events[0],
            DelayedAckEvent::StateUpdateFinalized { end_height: 150, .. }
        ));
        assert_eq!(report.finalized, 1);

        finalizer
            .end_block(&mut store, BlockContext::new(3, SEVEN_DAYS + 2))
            .unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);

        let stored = finalizer
            .packets()
            .get(&store, &key.with_status(PacketStatus::Finalized))
            .unwrap();
        assert_eq!(stored.acknowledgement, Some(Acknowledgement::Success(vec![1])));
        assert_eq!(stored.status_updated_at, Some(SEVEN_DAYS + 1));
    }

    #[test]
    fn test_packets_above_finalized_height_stay_pending() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        enqueue(&mut store, &finalizer, 151, 1, vec![2]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS + 1))
            .unwrap();
        assert_eq!(report.finalized, 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_causal_order_within_update() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        enqueue(&mut store, &finalizer, 140, 1, vec![3]);
        enqueue(&mut store, &finalizer, 110, 7, vec![2]);
        enqueue(&mut store, &finalizer, 110, 2, vec![1]);

        finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS))
            .unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_handler_failure_still_finalizes_with_error_ack() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        let key = enqueue(&mut store, &finalizer, 120, 1, vec![0xFF]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS))
            .unwrap();
        assert!(report.events.iter().any(|e| matches!(
            e,
            DelayedAckEvent::PacketFinalized { success: false, .. }
        )));

        let stored = finalizer
            .packets()
            .get(&store, &key.with_status(PacketStatus::Finalized))
            .unwrap();
        assert!(matches!(stored.acknowledgement, Some(Acknowledgement::Error(_))));
        assert!(stored.error.is_some());
        // Handler writes of the failed call are discarded
        assert!(!store.exists(b"app/\xFF").unwrap());

        finalizer
            .end_block(&mut store, BlockContext::new(3, SEVEN_DAYS + 10))
            .unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_fraud_reverts_without_handler() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        let below = enqueue(&mut store, &finalizer, 105, 1, vec![1]);
        let at = enqueue(&mut store, &finalizer, 110, 1, vec![2]);
        let above = enqueue(&mut store, &finalizer, 120, 1, vec![3]);

        finalizer
            .verifier()
            .report_fraud(&mut store, &rollapp(), 110, "bad root".into())
            .unwrap();
        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, 3 * SECS_PER_DAY))
            .unwrap();

        assert_eq!(report.reverted, 2);
        assert!(calls.lock().unwrap().is_empty());
        let packets = finalizer.packets();
        assert_eq!(packets.get_by_id(&store, &below.id).unwrap().status, PacketStatus::Pending);
        assert_eq!(packets.get_by_id(&store, &at.id).unwrap().status, PacketStatus::Reverted);
        assert_eq!(packets.get_by_id(&store, &above.id).unwrap().status, PacketStatus::Reverted);

        // The fraudulent update never finalizes, so the handler never runs
        finalizer
            .end_block(&mut store, BlockContext::new(3, 30 * SECS_PER_DAY))
            .unwrap();
        assert!(calls.lock().unwrap().is_empty());
        let update = finalizer.ledger().get_update(&store, &rollapp(), 0).unwrap();
        assert_eq!(update.trust_status, TrustStatus::Fraudulent);
    }

    #[test]
    fn test_reverify_fraud_freezes_before_packets() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        enqueue(&mut store, &finalizer, 155, 1, vec![1]);

        // Header arrives before its state update and is queued
        finalizer
            .verifier()
            .verify(&mut store, ClientHeader::new(rollapp(), 152, [0xAB; 32]))
            .unwrap();
        finalizer
            .ledger()
            .submit(&mut store, &rollapp(), 151, 160, proof(151, 160), 10)
            .unwrap();

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, 20))
            .unwrap();
        assert!(matches!(
            report.events[0],
            DelayedAckEvent::ChainFrozen { fraud_height: 152, .. }
        ));
        assert_eq!(report.reverted, 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hook_failure_defers_and_retries() {
        let failing = Arc::new(Mutex::new(true));
        let hooks = MultiDelayedAckHooks::new(vec![
            Box::new(FlakyHook {
                failing: Arc::clone(&failing),
            }),
            Box::new(BaseDelayedAckHook),
        ]);
        let (mut store, finalizer, calls) = setup(hooks);
        let key = enqueue(&mut store, &finalizer, 120, 1, vec![1]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS))
            .unwrap();
        assert_eq!(report.deferred, 1);
        assert_eq!(
            finalizer.packets().get(&store, &key).unwrap().status,
            PacketStatus::Pending
        );
        // Nothing from the aborted unit reached committed state
        assert!(!store.exists(b"app/\x01").unwrap());

        *failing.lock().unwrap() = false;
        let report = finalizer
            .end_block(&mut store, BlockContext::new(3, SEVEN_DAYS + 5))
            .unwrap();
        assert_eq!(report.finalized, 1);
        assert!(store.exists(b"app/\x01").unwrap());

        // One committed execution; the aborted attempt left no effects
        let committed = finalizer
            .packets()
            .list_by_status(&store, PacketStatus::Finalized)
            .unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_revert_commits_despite_hook_failure() {
        let failing = Arc::new(Mutex::new(true));
        let hooks = MultiDelayedAckHooks::new(vec![Box::new(FlakyHook {
            failing: Arc::clone(&failing),
        })]);
        let (mut store, finalizer, _calls) = setup(hooks);
        let key = enqueue(&mut store, &finalizer, 120, 1, vec![1]);

        finalizer
            .verifier()
            .report_fraud(&mut store, &rollapp(), 110, "bad".into())
            .unwrap();
        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, 10))
            .unwrap();

        let reverted_key = key.with_status(PacketStatus::Reverted);
        assert_eq!(
            report.events,
            vec![
                DelayedAckEvent::PacketReverted {
                    key: reverted_key.clone()
                },
                DelayedAckEvent::RevertHookFailed {
                    key: reverted_key.clone(),
                    reason: "Hook flaky failed: not now".into(),
                },
            ]
        );
        assert!(finalizer.packets().get(&store, &reverted_key).is_ok());
        // Hook writes discarded
        assert!(!store
            .exists(format!("hook/{}", reverted_key).as_bytes())
            .unwrap());

        // Never retried
        let again = finalizer
            .end_block(&mut store, BlockContext::new(3, 20))
            .unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_prune_after_retention() {
        let mut store = InMemoryKVStore::new();
        let (finalizer, _) = finalizer(
            MultiDelayedAckHooks::empty(),
            DelayedAckParams {
                prune_after_secs: 100,
                max_prune_per_block: 1,
            },
        );
        finalizer
            .ledger()
            .register_rollapp(&mut store, rollapp())
            .unwrap();
        finalizer
            .ledger()
            .submit(&mut store, &rollapp(), 100, 150, proof(100, 150), 0)
            .unwrap();
        enqueue(&mut store, &finalizer, 120, 1, vec![1]);
        enqueue(&mut store, &finalizer, 121, 1, vec![2]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(1, SEVEN_DAYS))
            .unwrap();
        assert_eq!(report.finalized, 2);
        assert_eq!(report.pruned, 0);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS + 99))
            .unwrap();
        assert_eq!(report.pruned, 0);

        // One per block
        let report = finalizer
            .end_block(&mut store, BlockContext::new(3, SEVEN_DAYS + 100))
            .unwrap();
        assert_eq!(report.pruned, 1);
        let report = finalizer
            .end_block(&mut store, BlockContext::new(4, SEVEN_DAYS + 101))
            .unwrap();
        assert_eq!(report.pruned, 1);

        assert!(finalizer
            .packets()
            .list_by_status(&store, PacketStatus::Finalized)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_prune_notifies_every_listener_before_delete() {
        let mut store = InMemoryKVStore::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = MultiDelayedAckHooks::new(vec![
            Box::new(DeleteRecorder {
                name: "first",
                broken: true,
                log: Arc::clone(&log),
            }),
            Box::new(DeleteRecorder {
                name: "second",
                broken: false,
                log: Arc::clone(&log),
            }),
        ]);
        let (finalizer, _) = finalizer(
            hooks,
            DelayedAckParams {
                prune_after_secs: 100,
                max_prune_per_block: 0,
            },
        );
        finalizer
            .ledger()
            .register_rollapp(&mut store, rollapp())
            .unwrap();
        finalizer
            .ledger()
            .submit(&mut store, &rollapp(), 100, 150, proof(100, 150), 0)
            .unwrap();
        enqueue(&mut store, &finalizer, 120, 1, vec![1]);
        finalizer
            .end_block(&mut store, BlockContext::new(1, SEVEN_DAYS))
            .unwrap();
        assert!(log.lock().unwrap().is_empty());

        let report = finalizer
            .end_block(&mut store, BlockContext::new(2, SEVEN_DAYS + 100))
            .unwrap();
        assert_eq!(report.pruned, 1);

        // Both listeners ran, in order, while the packet was still stored
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:1:true".to_string(), "second:1:true".to_string()]
        );
        // Listener writes committed with the delete
        assert_eq!(store.get(b"deleted/second/1").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"deleted/first/1").unwrap(), None);
        assert!(finalizer
            .packets()
            .list_by_status(&store, PacketStatus::Finalized)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_packet_below_first_update_never_finalizes() {
        let (mut store, finalizer, calls) = setup(MultiDelayedAckHooks::empty());
        // The chain's first update covers [100, 150]; 50 and 0 are unattested
        let low = enqueue(&mut store, &finalizer, 50, 1, vec![1]);
        let zero = enqueue(&mut store, &finalizer, 0, 1, vec![2]);
        let covered = enqueue(&mut store, &finalizer, 100, 1, vec![3]);

        let report = finalizer
            .end_block(&mut store, BlockContext::new(1, SEVEN_DAYS))
            .unwrap();
        assert_eq!(report.finalized, 1);
        assert_eq!(*calls.lock().unwrap(), vec![vec![3]]);
        for key in [&low, &zero] {
            assert_eq!(
                finalizer.packets().get(&store, key).unwrap().status,
                PacketStatus::Pending
            );
        }
        assert_eq!(
            finalizer
                .packets()
                .get_by_id(&store, &covered.id)
                .unwrap()
                .status,
            PacketStatus::Finalized
        );
    }

    #[test]
    fn test_unregistered_long_id_not_finalized_by_prefix_sibling() {
        let mut store = InMemoryKVStore::new();
        let (finalizer, calls) = finalizer(
            MultiDelayedAckHooks::empty(),
            DelayedAckParams::default(),
        );
        let short = RollappId::new("a");
        finalizer.ledger().register_rollapp(&mut store, short.clone()).unwrap();
        finalizer
            .ledger()
            .submit(&mut store, &short, 1, 10, proof(1, 10), 0)
            .unwrap();

        let long = RollappId::new(format!("a{}", "x".repeat(65_536)));
        let packet = RollappPacket::new(long, PacketType::OnRecv, 5, 1, vec![9]);
        let key = finalizer.packets().enqueue(&mut store, packet).unwrap();

        let report = finalizer
            .end_block(&mut store, BlockContext::new(1, SEVEN_DAYS))
            .unwrap();
        assert_eq!(report.finalized, 0);
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            finalizer.packets().get(&store, &key).unwrap().status,
            PacketStatus::Pending
        );
    }

    #[test]
    fn test_chains_processed_in_id_order() {
        let mut store = InMemoryKVStore::new();
        let (finalizer, calls) = finalizer(
            MultiDelayedAckHooks::empty(),
            DelayedAckParams::default(),
        );
        for id in ["rollapp_b", "rollapp_a"] {
            let id = RollappId::new(id);
            finalizer.ledger().register_rollapp(&mut store, id.clone()).unwrap();
            finalizer
                .ledger()
                .submit(&mut store, &id, 1, 10, proof(1, 10), 0)
                .unwrap();
            let packet = RollappPacket::new(
                id.clone(),
                PacketType::OnRecv,
                5,
                1,
                id.as_str().as_bytes().to_vec(),
            );
            finalizer.packets().enqueue(&mut store, packet).unwrap();
        }

        finalizer
            .end_block(&mut store, BlockContext::new(1, SEVEN_DAYS))
            .unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![b"rollapp_a".to_vec(), b"rollapp_b".to_vec()]
        );
    }
}
