//! # Inbound Ports
//!
//! API trait defining what the State-Update Ledger can do.

use crate::config::LedgerParams;
use crate::domain::{LightClientRecord, Result, StateUpdate, StateUpdateProof};
use shared_types::{Height, KeyValueStore, RollappId, Timestamp};

/// State-Update Ledger API - inbound port.
pub trait StateUpdateLedgerApi {
    /// Chain-level parameters.
    fn params(&self) -> &LedgerParams;

    /// Create the light-client record of a new origin chain.
    fn register_rollapp(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: RollappId,
    ) -> Result<LightClientRecord>;

    /// Read a chain's light-client record.
    fn get_record(&self, store: &dyn KeyValueStore, rollapp_id: &RollappId)
        -> Result<LightClientRecord>;

    /// Every registered chain, ascending by identifier.
    fn list_records(&self, store: &dyn KeyValueStore) -> Result<Vec<LightClientRecord>>;

    /// Record of a chain that may still receive packets: registered and not
    /// frozen.
    fn check_admission(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
    ) -> Result<LightClientRecord>;

    /// [`check_admission`](Self::check_admission) plus the packet's proof
    /// height: height 0 and heights below the first update's start are
    /// never attested.
    fn check_packet_admission(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        proof_height: Height,
    ) -> Result<LightClientRecord>;

    /// Append a state update covering `[start, end]`.
    fn submit(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        start: Height,
        end: Height,
        proof: StateUpdateProof,
        now: Timestamp,
    ) -> Result<StateUpdate>;

    /// Read one state update.
    fn get_update(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        index: u64,
    ) -> Result<StateUpdate>;

    /// All updates of a chain in submission order.
    fn list_updates(&self, store: &dyn KeyValueStore, rollapp_id: &RollappId)
        -> Result<Vec<StateUpdate>>;

    /// The update whose range contains `height`, if any.
    fn update_covering(
        &self,
        store: &dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
    ) -> Result<Option<StateUpdate>>;

    /// Whether an unverified update has outlived its dispute window.
    fn dispute_window_elapsed(&self, update: &StateUpdate, now: Timestamp) -> bool;

    /// Finalize every unverified update ending at or below `up_to_height`,
    /// in order, stopping at the first fraudulent one. Returns the updates
    /// that changed.
    fn mark_finalized(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        up_to_height: Height,
    ) -> Result<Vec<StateUpdate>>;

    /// Finalize the leading run of unverified updates whose dispute window
    /// has elapsed. Returns the updates that changed.
    fn finalize_elapsed(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        now: Timestamp,
    ) -> Result<Vec<StateUpdate>>;

    /// Record fraud at `at_height`: the containing update and every later
    /// unverified update become fraudulent and the chain freezes. Returns
    /// the updates that changed.
    fn mark_fraudulent(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        at_height: Height,
    ) -> Result<Vec<StateUpdate>>;

    /// Raise `last_verified_height` to `height` if higher.
    fn record_verified_height(
        &self,
        store: &mut dyn KeyValueStore,
        rollapp_id: &RollappId,
        height: Height,
    ) -> Result<LightClientRecord>;
}
