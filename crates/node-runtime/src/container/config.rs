//! # Node Configuration
//!
//! Unified configuration for the hub subsystems and the runtime.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HUB_DISPUTE_PERIOD_SECS` | `604800` | Dispute window of a state update |
//! | `HUB_MAX_PENDING_HEADERS` | `256` | Queued headers per rollapp |
//! | `HUB_PRUNE_AFTER_SECS` | `86400` | Retention of terminal packets |
//! | `HUB_MAX_PRUNE_PER_BLOCK` | `1000` | Prune cap per block (0 = none) |
//! | `HUB_STORAGE_BACKEND` | `memory` | `memory` or `rocksdb` |
//! | `HUB_DATA_DIR` | `./data/hub` | RocksDB directory |

use hub_02_state_updates::LedgerParams;
use hub_04_delayed_ack::DelayedAckParams;
use hub_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// State-update ledger parameters.
    pub ledger: LedgerParams,
    /// Delayed-ack finalizer parameters.
    pub delayed_ack: DelayedAckParams,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|var| std::env::var(var).ok())?;
        config.telemetry = TelemetryConfig::from_env();
        Ok(config)
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var(&lookup, "HUB_DISPUTE_PERIOD_SECS")? {
            config.ledger.dispute_period_secs = value;
        }
        if let Some(value) = parse_var(&lookup, "HUB_MAX_PENDING_HEADERS")? {
            config.ledger.max_pending_headers = value;
        }
        if let Some(value) = parse_var(&lookup, "HUB_PRUNE_AFTER_SECS")? {
            config.delayed_ack.prune_after_secs = value;
        }
        if let Some(value) = parse_var(&lookup, "HUB_MAX_PRUNE_PER_BLOCK")? {
            config.delayed_ack.max_prune_per_block = value;
        }
        if let Some(backend) = lookup("HUB_STORAGE_BACKEND") {
            config.storage.backend = backend.parse()?;
        }
        if let Some(dir) = lookup("HUB_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the subsystems cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger
            .validate()
            .map_err(|e| ConfigError::InvalidParams(e.to_string()))?;
        self.delayed_ack
            .validate()
            .map_err(|e| ConfigError::InvalidParams(e.to_string()))?;
        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable(
                StorageBackend::RocksDb.to_string(),
            ));
        }
        Ok(())
    }

    /// Create a config for testing (in-memory, short windows).
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig::default(),
            ledger: LedgerParams::for_testing(),
            delayed_ack: DelayedAckParams::for_testing(),
            telemetry: TelemetryConfig::for_testing(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// `HUB_STORAGE_BACKEND` names no known backend.
    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),

    /// The backend exists but was not compiled in.
    #[error("Storage backend {0} requires the matching cargo feature")]
    BackendUnavailable(String),

    /// Subsystem parameters failed validation.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Which store the node runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile in-memory store.
    #[default]
    Memory,
    /// RocksDB under `data_dir`.
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("memory"),
            StorageBackend::RocksDb => f.write_str("rocksdb"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend selection.
    pub backend: StorageBackend,
    /// Data directory for persistent backends.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data/hub"),
        }
    }
}
