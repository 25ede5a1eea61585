//! # Hub Application
//!
//! Owns the committed store and the assembled subsystems, and exposes the
//! inputs the hub accepts: chain registration, packet admission, state
//! updates, client headers, fraud proofs and block boundaries.
//!
//! Inputs between two `end_block` calls are applied directly to the store.
//! The `end_block` pass runs inside an overlay and commits in one batch, so
//! a pass that errors leaves committed state as it was before the block.

use crate::container::config::NodeConfig;
use crate::handlers::{OrderTrackingHook, TransferApp};
use hub_01_packet_store::{
    PacketId, PacketKey, PacketStatus, PacketStore, PacketStoreApi, PacketStoreError, PacketType,
    RollappPacket,
};
use hub_02_state_updates::{
    LedgerError, LightClientRecord, StateUpdate, StateUpdateLedger, StateUpdateLedgerApi,
    StateUpdateProof,
};
use hub_03_light_client::{
    ClientHeader, LightClientVerifier, LightClientVerifierApi, VerificationOutcome, VerifierError,
};
use hub_04_delayed_ack::{
    DeferredPacketHandler, DelayedAckError, DelayedAckHooks, EndBlockReport, HookError,
    MultiDelayedAckHooks, PacketFinalizer, PacketFinalizerApi,
};
use shared_types::{
    BlockContext, Height, KVStoreError, KeyValueStore, RollappId, StoreOverlay, Timestamp,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to the submitter of a hub input.
#[derive(Debug, Error)]
pub enum HubError {
    /// Packet admission or lookup failed.
    #[error(transparent)]
    PacketStore(#[from] PacketStoreError),

    /// Ledger rejected the input.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Verifier failed.
    #[error(transparent)]
    Verifier(#[from] VerifierError),

    /// Finalizer pass failed; nothing from the pass was committed.
    #[error(transparent)]
    DelayedAck(#[from] DelayedAckError),

    /// Listener-owned state could not be written.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Subsystem parameters are unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Block time moved backwards.
    #[error("Block time {got} is before the previous block time {last}")]
    TimeWentBackwards {
        /// Time of the previous block
        last: Timestamp,
        /// Rejected time
        got: Timestamp,
    },
}

/// Result type for hub inputs.
pub type HubResult<T> = Result<T, HubError>;

/// The assembled settlement hub.
pub struct HubApp<S: KeyValueStore, H: DeferredPacketHandler = TransferApp> {
    store: S,
    block: BlockContext,
    packets: PacketStore,
    finalizer: PacketFinalizer<H>,
}

impl<S: KeyValueStore> HubApp<S, TransferApp> {
    /// Assemble the node's default application: token transfers with the
    /// order-tracking listener.
    pub fn from_config(store: S, config: &NodeConfig) -> HubResult<Self> {
        let hooks: Vec<Box<dyn DelayedAckHooks>> = vec![Box::new(OrderTrackingHook::new())];
        Self::new(
            store,
            config,
            TransferApp::new(),
            MultiDelayedAckHooks::new(hooks),
        )
    }
}

impl<S: KeyValueStore, H: DeferredPacketHandler> HubApp<S, H> {
    /// Assemble a hub around `store`. The hook list is fixed from here on.
    pub fn new(
        store: S,
        config: &NodeConfig,
        handler: H,
        hooks: MultiDelayedAckHooks,
    ) -> HubResult<Self> {
        config
            .validate()
            .map_err(|e| HubError::Config(e.to_string()))?;

        let ledger = StateUpdateLedger::new(config.ledger.clone());
        let verifier = LightClientVerifier::new(ledger);
        info!(
            dispute_period_secs = config.ledger.dispute_period_secs,
            prune_after_secs = config.delayed_ack.prune_after_secs,
            hooks = ?hooks.names(),
            "[node] Hub application assembled"
        );

        Ok(Self {
            store,
            block: BlockContext::default(),
            packets: PacketStore::new(),
            finalizer: PacketFinalizer::new(config.delayed_ack.clone(), verifier, handler, hooks),
        })
    }

    /// Committed store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Block currently open.
    pub fn block(&self) -> BlockContext {
        self.block
    }

    /// The assembled finalizer.
    pub fn finalizer(&self) -> &PacketFinalizer<H> {
        &self.finalizer
    }

    // ---------------------------------------------------------------------
    // Block boundaries
    // ---------------------------------------------------------------------

    /// Open the next block at hub time `time`.
    pub fn begin_block(&mut self, time: Timestamp) -> HubResult<BlockContext> {
        if time < self.block.time {
            return Err(HubError::TimeWentBackwards {
                last: self.block.time,
                got: time,
            });
        }
        self.block = BlockContext::new(self.block.height + 1, time);
        debug!(height = self.block.height, time, "[node] Block opened");
        Ok(self.block)
    }

    /// Run the finalizer pass for the open block and commit it.
    pub fn end_block(&mut self) -> HubResult<EndBlockReport> {
        let block = self.block;
        let (report, batch) = {
            let mut overlay = StoreOverlay::new(&self.store);
            let report = self.finalizer.end_block(&mut overlay, block)?;
            (report, overlay.into_batch())
        };
        self.store.atomic_batch_write(batch)?;
        Ok(report)
    }

    /// Open a block at `time` and immediately run its finalizer pass.
    pub fn produce_block(&mut self, time: Timestamp) -> HubResult<EndBlockReport> {
        self.begin_block(time)?;
        self.end_block()
    }

    // ---------------------------------------------------------------------
    // Inputs
    // ---------------------------------------------------------------------

    /// Register a new origin chain.
    pub fn register_rollapp(&mut self, rollapp_id: RollappId) -> HubResult<LightClientRecord> {
        Ok(self.finalizer.ledger().register_rollapp(&mut self.store, rollapp_id)?)
    }

    /// Admit a relayed packet as pending. Frozen or unknown chains, and
    /// heights no state update can attest, are rejected here.
    pub fn submit_packet(
        &mut self,
        rollapp_id: RollappId,
        packet_type: PacketType,
        proof_height: Height,
        sequence: u64,
        data: Vec<u8>,
        relayer: Option<String>,
    ) -> HubResult<PacketKey> {
        self.ledger()
            .check_packet_admission(&self.store, &rollapp_id, proof_height)?;

        let mut packet = RollappPacket::new(rollapp_id, packet_type, proof_height, sequence, data)
            .with_received_at(self.block.time);
        packet.relayer = relayer;
        Ok(self.packets.enqueue(&mut self.store, packet)?)
    }

    /// Append a state update, timestamped with the open block.
    pub fn submit_state_update(
        &mut self,
        rollapp_id: &RollappId,
        start_height: Height,
        end_height: Height,
        proof: StateUpdateProof,
    ) -> HubResult<StateUpdate> {
        let now = self.block.time;
        Ok(self
            .finalizer.ledger()
            .submit(&mut self.store, rollapp_id, start_height, end_height, proof, now)?)
    }

    /// Verify a light-client header.
    pub fn submit_header(&mut self, header: ClientHeader) -> HubResult<VerificationOutcome> {
        Ok(self.finalizer.verifier().verify(&mut self.store, header)?)
    }

    /// Accept a validated fraud proof.
    pub fn submit_fraud(
        &mut self,
        rollapp_id: &RollappId,
        height: Height,
        description: impl Into<String>,
    ) -> HubResult<VerificationOutcome> {
        Ok(self.finalizer.verifier().report_fraud(
            &mut self.store,
            rollapp_id,
            height,
            description.into(),
        )?)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Light-client record of a chain.
    pub fn record(&self, rollapp_id: &RollappId) -> HubResult<LightClientRecord> {
        Ok(self.ledger().get_record(&self.store, rollapp_id)?)
    }

    /// State updates of a chain in submission order.
    pub fn updates(&self, rollapp_id: &RollappId) -> HubResult<Vec<StateUpdate>> {
        Ok(self.ledger().list_updates(&self.store, rollapp_id)?)
    }

    /// A packet by identity, whatever its status.
    pub fn packet(&self, id: &PacketId) -> HubResult<RollappPacket> {
        Ok(self.packets.get_by_id(&self.store, id)?)
    }

    /// Every packet with `status`.
    pub fn packets_with_status(&self, status: PacketStatus) -> HubResult<Vec<RollappPacket>> {
        Ok(self.packets.list_by_status(&self.store, status)?)
    }

    fn ledger(&self) -> &StateUpdateLedger {
        self.finalizer.ledger()
    }
}

impl<S: KeyValueStore, H: DeferredPacketHandler> HubApp<S, H> {
    /// Mutable access to the committed store, for application-level writes
    /// outside the packet lifecycle.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore, H: DeferredPacketHandler> std::fmt::Debug for HubApp<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubApp")
            .field("block", &self.block)
            .field("finalizer", &self.finalizer)
            .finish()
    }
}
