//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::gateway::SendOutcome;

use super::{ATTEMPT_LOG_WRITE_ERRORS, DISPATCH_TOTAL, GATEWAY_LATENCY, GATEWAY_SENDS_TOTAL};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record the outcome of one hook invocation
    pub fn record(event: &str, outcome: &str) {
        DISPATCH_TOTAL.with_label_values(&[event, outcome]).inc();
    }
}

/// Helper struct for recording gateway metrics
pub struct GatewayMetrics;

impl GatewayMetrics {
    pub fn record_outcome(outcome: &SendOutcome) {
        GATEWAY_SENDS_TOTAL
            .with_label_values(&[outcome.label()])
            .inc();
    }

    pub fn record_latency(elapsed: Duration) {
        GATEWAY_LATENCY.observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for recording attempt log metrics
pub struct AttemptLogMetrics;

impl AttemptLogMetrics {
    pub fn record_write_error() {
        ATTEMPT_LOG_WRITE_ERRORS.inc();
    }
}
