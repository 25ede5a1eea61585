//! # Settlement Hub Node
//!
//! Replays a scenario of hub inputs through the assembled subsystems.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging
//! 3. Open the configured store
//! 4. Replay the scenario named by the first argument or `HUB_SCENARIO`
//!
//! ## Usage
//!
//! ```text
//! HUB_DISPUTE_PERIOD_SECS=60 node-runtime scenario.jsonl
//! ```

use anyhow::{bail, Context, Result};
use node_runtime::{replay, HubApp, NodeConfig, StorageBackend};
use shared_types::{InMemoryKVStore, KeyValueStore};
use tracing::info;

fn scenario_path() -> Option<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HUB_SCENARIO").ok())
}

fn run<S: KeyValueStore>(store: S, config: &NodeConfig, script: &str) -> Result<()> {
    let mut app = HubApp::from_config(store, config)?;
    let summary = replay(&mut app, script.as_bytes())?;
    info!(
        steps = summary.steps,
        rejected = summary.rejected,
        blocks = summary.blocks,
        finalized = summary.finalized,
        reverted = summary.reverted,
        deferred = summary.deferred,
        pruned = summary.pruned,
        "Scenario complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = NodeConfig::from_env().context("loading configuration")?;

    // Initialize logging
    hub_telemetry::init_logging(&config.telemetry)?;
    info!(
        service = %config.telemetry.service_name,
        version = node_runtime::VERSION,
        backend = %config.storage.backend,
        "Settlement hub starting"
    );

    let Some(path) = scenario_path() else {
        bail!("no scenario given: pass a path or set HUB_SCENARIO");
    };
    let script = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading scenario {}", path))?;

    match config.storage.backend {
        StorageBackend::Memory => run(InMemoryKVStore::new(), &config, &script),
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => {
            use node_runtime::adapters::storage::RocksDbStore;
            let store = RocksDbStore::open_default(&config.storage.data_dir)?;
            run(store, &config, &script)
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => bail!("rocksdb backend requires the rocksdb feature"),
    }
}
