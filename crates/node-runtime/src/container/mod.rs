//! # Container
//!
//! Node configuration and the assembled hub application.

pub mod app;
pub mod config;

pub use app::{HubApp, HubError, HubResult};
pub use config::{ConfigError, NodeConfig, StorageBackend, StorageConfig};
