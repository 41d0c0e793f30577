//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_decisions_total` (counter): requests by decision
//! - `dispatch_request_duration_seconds` (histogram): latency by decision, status

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Decision;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(decision: Decision) {
    counter!("dispatch_decisions_total", "decision" => decision.as_str()).increment(1);
}

pub fn record_request(decision: Decision, status: u16, start: Instant) {
    histogram!(
        "dispatch_request_duration_seconds",
        "decision" => decision.as_str(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
