//! # Scenario Replay
//!
//! Drives a [`HubApp`] from a JSON-lines script of hub inputs, one step per
//! line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"op":"register_rollapp","rollapp_id":"rollapp_1"}
//! {"op":"begin_block","time":1000}
//! {"op":"submit_state_update","rollapp_id":"rollapp_1","start_height":1,"end_height":10}
//! {"op":"submit_packet","rollapp_id":"rollapp_1","packet_type":"OnRecv","proof_height":5,"sequence":1,
//!  "data":{"denom":"adym","amount":"5","sender":"a","receiver":"b"}}
//! {"op":"end_block"}
//! ```
//!
//! Rejected inputs are logged and counted; the script keeps going. A failed
//! block boundary aborts the replay.

use crate::container::{HubApp, HubError};
use crate::handlers::OrderTrackingHook;
use hub_01_packet_store::PacketType;
use hub_02_state_updates::{BlockDescriptor, StateUpdateProof};
use hub_03_light_client::ClientHeader;
use hub_04_delayed_ack::{DeferredPacketHandler, EndBlockReport};
use serde::Deserialize;
use shared_types::{sha256, Hash, Height, KeyValueStore, RollappId, Timestamp};
use std::io::BufRead;
use thiserror::Error;
use tracing::{info, warn};

/// One scripted hub input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Register an origin chain.
    RegisterRollapp {
        /// Chain identifier
        rollapp_id: String,
    },
    /// Open the next block.
    BeginBlock {
        /// Hub time of the block
        time: Timestamp,
    },
    /// Run the finalizer pass of the open block.
    EndBlock,
    /// Relay a packet.
    SubmitPacket {
        /// Origin chain
        rollapp_id: String,
        /// Handler kind
        packet_type: PacketType,
        /// Origin height of the inclusion proof
        proof_height: Height,
        /// Channel sequence
        sequence: u64,
        /// Payload, forwarded as JSON bytes
        #[serde(default)]
        data: serde_json::Value,
        /// Relayer address
        #[serde(default)]
        relayer: Option<String>,
        /// Demand order to file against the packet
        #[serde(default)]
        order_id: Option<String>,
    },
    /// Submit a state update. Roots default to [`canonical_state_root`].
    SubmitStateUpdate {
        /// Origin chain
        rollapp_id: String,
        /// First covered height
        start_height: Height,
        /// Last covered height
        end_height: Height,
        /// Hex state roots, one per height
        #[serde(default)]
        state_roots: Option<Vec<String>>,
    },
    /// Submit a light-client header. The root defaults to
    /// [`canonical_state_root`].
    SubmitHeader {
        /// Origin chain
        rollapp_id: String,
        /// Header height
        height: Height,
        /// Hex state root
        #[serde(default)]
        state_root: Option<String>,
    },
    /// Submit a validated fraud proof.
    SubmitFraud {
        /// Origin chain
        rollapp_id: String,
        /// Fraudulent height
        height: Height,
        /// Evidence summary
        #[serde(default)]
        description: String,
    },
}

/// Replay errors.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Script could not be read.
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid step.
    #[error("Line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Parser error
        source: serde_json::Error,
    },

    /// A state root is not 32 bytes of hex.
    #[error("Line {line}: invalid state root {value:?}")]
    InvalidRoot {
        /// 1-based line number
        line: usize,
        /// Offending value
        value: String,
    },

    /// A block boundary failed.
    #[error("Line {line}: {source}")]
    Block {
        /// 1-based line number
        line: usize,
        /// Hub error
        source: HubError,
    },
}

/// Totals of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSummary {
    /// Steps executed
    pub steps: usize,
    /// Inputs the hub rejected
    pub rejected: usize,
    /// Finalizer passes run
    pub blocks: usize,
    /// Packets finalized
    pub finalized: usize,
    /// Packets reverted
    pub reverted: usize,
    /// Finalizations deferred
    pub deferred: usize,
    /// Packets pruned
    pub pruned: usize,
}

impl ScenarioSummary {
    fn absorb(&mut self, report: &EndBlockReport) {
        self.blocks += 1;
        self.finalized += report.finalized;
        self.reverted += report.reverted;
        self.deferred += report.deferred;
        self.pruned += report.pruned;
    }
}

/// Root a script uses when it does not spell one out:
/// `sha256(rollapp_id || height_be)`.
pub fn canonical_state_root(rollapp_id: &RollappId, height: Height) -> Hash {
    let mut preimage = rollapp_id.as_str().as_bytes().to_vec();
    preimage.extend_from_slice(&height.to_be_bytes());
    sha256(&preimage)
}

fn parse_root(line: usize, value: &str) -> Result<Hash, ScenarioError> {
    let invalid = || ScenarioError::InvalidRoot {
        line,
        value: value.to_string(),
    };
    let bytes = hex::decode(value.trim_start_matches("0x")).map_err(|_| invalid())?;
    bytes.try_into().map_err(|_| invalid())
}

/// Parse one script line; `None` for blank and comment lines.
pub fn parse_step(line: usize, text: &str) -> Result<Option<ScenarioStep>, ScenarioError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|source| ScenarioError::Parse { line, source })
}

/// Replay every step read from `reader` against `app`.
pub fn replay<S, H, R>(app: &mut HubApp<S, H>, reader: R) -> Result<ScenarioSummary, ScenarioError>
where
    S: KeyValueStore,
    H: DeferredPacketHandler,
    R: BufRead,
{
    let mut summary = ScenarioSummary::default();

    for (index, text) in reader.lines().enumerate() {
        let line = index + 1;
        let Some(step) = parse_step(line, &text?)? else {
            continue;
        };
        summary.steps += 1;

        match apply_step(app, line, step)? {
            StepOutcome::Applied => {}
            StepOutcome::Block(report) => {
                info!(
                    line,
                    height = report.block.height,
                    time = report.block.time,
                    events = report.events.len(),
                    "[node] Block committed"
                );
                summary.absorb(&report);
            }
            StepOutcome::Rejected(err) => {
                warn!(line, error = %err, "[node] Scenario input rejected");
                summary.rejected += 1;
            }
        }
    }

    info!(
        steps = summary.steps,
        rejected = summary.rejected,
        blocks = summary.blocks,
        finalized = summary.finalized,
        reverted = summary.reverted,
        "[node] Scenario replayed"
    );
    Ok(summary)
}

enum StepOutcome {
    Applied,
    Block(EndBlockReport),
    Rejected(HubError),
}

fn apply_step<S, H>(
    app: &mut HubApp<S, H>,
    line: usize,
    step: ScenarioStep,
) -> Result<StepOutcome, ScenarioError>
where
    S: KeyValueStore,
    H: DeferredPacketHandler,
{
    let block_error = |source| ScenarioError::Block { line, source };

    let result = match step {
        ScenarioStep::BeginBlock { time } => {
            app.begin_block(time).map_err(block_error)?;
            return Ok(StepOutcome::Applied);
        }
        ScenarioStep::EndBlock => {
            let report = app.end_block().map_err(block_error)?;
            return Ok(StepOutcome::Block(report));
        }
        ScenarioStep::RegisterRollapp { rollapp_id } => {
            app.register_rollapp(RollappId::new(rollapp_id)).map(drop)
        }
        ScenarioStep::SubmitPacket {
            rollapp_id,
            packet_type,
            proof_height,
            sequence,
            data,
            relayer,
            order_id,
        } => {
            let payload = serde_json::to_vec(&data)
                .map_err(|source| ScenarioError::Parse { line, source })?;
            app.submit_packet(
                RollappId::new(rollapp_id),
                packet_type,
                proof_height,
                sequence,
                payload,
                relayer,
            )
            .and_then(|key| match order_id {
                Some(order_id) => OrderTrackingHook::track(app.store_mut(), &key, order_id)
                    .map(drop)
                    .map_err(HubError::from),
                None => Ok(()),
            })
        }
        ScenarioStep::SubmitStateUpdate {
            rollapp_id,
            start_height,
            end_height,
            state_roots,
        } => {
            let rollapp_id = RollappId::new(rollapp_id);
            let time = app.block().time;
            let descriptors = match state_roots {
                Some(roots) => roots
                    .iter()
                    .zip(start_height..)
                    .map(|(root, height)| {
                        Ok(BlockDescriptor::new(height, parse_root(line, root)?, time))
                    })
                    .collect::<Result<Vec<_>, ScenarioError>>()?,
                None => (start_height..=end_height)
                    .map(|h| BlockDescriptor::new(h, canonical_state_root(&rollapp_id, h), time))
                    .collect(),
            };
            app.submit_state_update(
                &rollapp_id,
                start_height,
                end_height,
                StateUpdateProof::new(descriptors),
            )
            .map(drop)
        }
        ScenarioStep::SubmitHeader {
            rollapp_id,
            height,
            state_root,
        } => {
            let rollapp_id = RollappId::new(rollapp_id);
            let root = match state_root {
                Some(root) => parse_root(line, &root)?,
                None => canonical_state_root(&rollapp_id, height),
            };
            let time = app.block().time;
            app.submit_header(ClientHeader::new(rollapp_id, height, root).with_timestamp(time))
                .map(|outcome| info!(line, ?outcome, "[node] Header verified"))
        }
        ScenarioStep::SubmitFraud {
            rollapp_id,
            height,
            description,
        } => app
            .submit_fraud(&RollappId::new(rollapp_id), height, description)
            .map(drop),
    };

    Ok(match result {
        Ok(()) => StepOutcome::Applied,
        Err(err) => StepOutcome::Rejected(err),
    })
}
