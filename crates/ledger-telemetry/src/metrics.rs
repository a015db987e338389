//! Prometheus metrics for the degree ledger.
//!
//! All metrics follow the naming convention: `dl_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CHAIN STORE
    // =========================================================================

    /// Blocks appended to the ledger file (genesis excluded)
    pub static ref BLOCKS_COMMITTED: Counter = Counter::new(
        "dl_blocks_committed_total",
        "Total number of blocks committed to the ledger"
    ).expect("metric creation failed");

    /// Tampered blocks found by verification or audit
    pub static ref TAMPER_DETECTED: Counter = Counter::new(
        "dl_tamper_detected_total",
        "Total number of blocks whose stored hash did not verify"
    ).expect("metric creation failed");

    // =========================================================================
    // APPROVAL QUORUM
    // =========================================================================

    /// Votes stored (affirmative and negative)
    pub static ref VOTES_RECORDED: Counter = Counter::new(
        "dl_votes_recorded_total",
        "Total number of approval votes recorded"
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER SERVICE
    // =========================================================================

    /// Records submitted for approval
    pub static ref SUBMISSIONS: Counter = Counter::new(
        "dl_submissions_total",
        "Total number of records submitted for approval"
    ).expect("metric creation failed");

    /// Verification requests by outcome
    pub static ref VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("dl_verifications_total", "Total verification requests"),
        &["outcome"]  // outcome: verified/not_found/tampered/error
    ).expect("metric creation failed");

    /// Errors surfaced to callers by kind
    pub static ref LEDGER_ERRORS: CounterVec = CounterVec::new(
        Opts::new("dl_ledger_errors_total", "Total errors returned by the ledger service"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Register every ledger metric with [`REGISTRY`].
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BLOCKS_COMMITTED.clone()),
        Box::new(TAMPER_DETECTED.clone()),
        Box::new(VOTES_RECORDED.clone()),
        Box::new(SUBMISSIONS.clone()),
        Box::new(VERIFICATIONS.clone()),
        Box::new(LEDGER_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Render all metrics in the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
