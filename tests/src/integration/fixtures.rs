//! Shared fixtures for the integration tests.

use hub_01_packet_store::{Acknowledgement, PacketId, PacketType, RollappPacket};
use hub_02_state_updates::{BlockDescriptor, StateUpdateProof};
use hub_04_delayed_ack::{
    DeferredPacketHandler, DelayedAckHooks, HandlerError, HookError, MultiDelayedAckHooks,
};
use node_runtime::wiring::canonical_state_root;
use node_runtime::{HubApp, NodeConfig};
use shared_types::{
    decode, encode, Height, InMemoryKVStore, KeyValueStore, RollappId, Timestamp, SECS_PER_DAY,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type TestHub = HubApp<InMemoryKVStore, RecordingHandler>;

/// Handler that logs every invocation and counts committed executions
/// per payload in the store.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingHandler {
    pub fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().clone()
    }

    fn execution_key(data: &[u8]) -> Vec<u8> {
        [b"exec/".as_slice(), data].concat()
    }

    /// Committed executions of `data`.
    pub fn executions(store: &dyn KeyValueStore, data: &[u8]) -> u64 {
        store
            .get(&Self::execution_key(data))
            .unwrap()
            .map(|bytes| decode(&bytes).unwrap())
            .unwrap_or(0)
    }
}

impl DeferredPacketHandler for RecordingHandler {
    fn handle_finalized_packet(
        &self,
        store: &mut dyn KeyValueStore,
        _packet_type: PacketType,
        data: &[u8],
    ) -> Result<Acknowledgement, HandlerError> {
        self.calls.lock().unwrap().push(data.to_vec());
        let key = Self::execution_key(data);
        let count: u64 = match store.get(&key)? {
            Some(bytes) => decode(&bytes)?,
            None => 0,
        };
        store.put(&key, &encode(&(count + 1))?)?;
        Ok(Acknowledgement::Success(vec![1]))
    }
}

/// Listener that fails its first `failures` status updates.
pub struct FlakyHook {
    name: String,
    failures_left: Arc<AtomicUsize>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FlakyHook {
    pub fn boxed(name: &str, failures: usize, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn DelayedAckHooks> {
        Box::new(Self {
            name: name.to_string(),
            failures_left: Arc::new(AtomicUsize::new(failures)),
            log: Arc::clone(log),
        })
    }
}

impl DelayedAckHooks for FlakyHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn after_packet_status_updated(
        &self,
        _store: &mut dyn KeyValueStore,
        packet: &RollappPacket,
        _old_key: &hub_01_packet_store::PacketKey,
        new_key: &hub_01_packet_store::PacketKey,
    ) -> Result<(), HookError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.name, packet.proof_height, new_key.status));
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(HookError::failed(self.name.clone(), "not ready"));
        }
        Ok(())
    }
}

pub fn rollapp() -> RollappId {
    RollappId::new("R1")
}

/// Config with the given dispute period and retention long enough that
/// nothing is pruned during a test.
pub fn config(dispute_period_secs: u64) -> NodeConfig {
    let mut config = NodeConfig::for_testing();
    config.ledger.dispute_period_secs = dispute_period_secs;
    config.delayed_ack.prune_after_secs = 365 * SECS_PER_DAY;
    config
}

pub fn hub(dispute_period_secs: u64, hooks: Vec<Box<dyn DelayedAckHooks>>) -> (TestHub, RecordingHandler) {
    let handler = RecordingHandler::default();
    let mut app = HubApp::new(
        InMemoryKVStore::new(),
        &config(dispute_period_secs),
        handler.clone(),
        MultiDelayedAckHooks::new(hooks),
    )
    .unwrap();
    app.register_rollapp(rollapp()).unwrap();
    (app, handler)
}

/// Proof with canonical roots for every height of `[start, end]`.
pub fn proof(start: Height, end: Height, time: Timestamp) -> StateUpdateProof {
    let rollapp = rollapp();
    StateUpdateProof::new(
        (start..=end)
            .map(|h| BlockDescriptor::new(h, canonical_state_root(&rollapp, h), time))
            .collect(),
    )
}

pub fn packet_data(proof_height: Height, sequence: u64) -> Vec<u8> {
    format!("{}/{}", proof_height, sequence).into_bytes()
}

pub fn packet_id(proof_height: Height, sequence: u64) -> PacketId {
    PacketId {
        rollapp_id: rollapp(),
        proof_height,
        sequence,
        packet_type: PacketType::OnRecv,
    }
}

/// Admit an `OnRecv` packet carrying [`packet_data`].
pub fn relay(app: &mut TestHub, proof_height: Height, sequence: u64) -> PacketId {
    app.submit_packet(
        rollapp(),
        PacketType::OnRecv,
        proof_height,
        sequence,
        packet_data(proof_height, sequence),
        None,
    )
    .unwrap()
    .id
}
