//! # Hub Telemetry
//!
//! Structured logging for the settlement hub node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Every tracing event from here on is filtered and formatted
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HUB_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `HUB_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |
//! | `HUB_CONSOLE_OUTPUT` | `true` | Write to stdout |
//! | `HUB_SERVICE_NAME` | `settlement-hub` | Service name |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use hub_telemetry::subsystem_span;
///
/// fn end_block(height: u64) {
///     let _span = subsystem_span!("end_block", subsystem = "delayed-ack", height = height).entered();
///     // ... finalizer pass
/// }
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
