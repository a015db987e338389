//! # Ledger Telemetry
//!
//! Structured logging and Prometheus metrics for the degree ledger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _ = init_telemetry(&TelemetryConfig::from_env());
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DL_SERVICE_NAME` | `degree-ledger` | Service name in logs |
//! | `DL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DL_JSON_LOGS` | `false` | JSON log lines instead of console format |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, BLOCKS_COMMITTED, LEDGER_ERRORS, REGISTRY, SUBMISSIONS,
    TAMPER_DETECTED, VERIFICATIONS, VOTES_RECORDED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the logging subscriber.
///
/// `AlreadyInitialized` is harmless; callers may ignore it.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    logging::init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
