//! Metrics collection and exposition.
//!
//! # Metrics
//! - `trustwatch_lookups_total` (counter): lookups by endpoint, outcome
//! - `trustwatch_lookup_duration_seconds` (histogram): latency by endpoint
//!
//! Outcomes are verdict names (`found`, `not_found`, `safe`, `dangerous`) or
//! error kinds (`client_input`, `configuration`, `upstream`, `proxy`).

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished lookup. A no-op when no recorder is installed.
pub fn record_lookup(endpoint: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "trustwatch_lookups_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("trustwatch_lookup_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
