//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, outcome
//! - `proxy_request_duration_seconds` (histogram): latency by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure is logged, not fatal; the proxy serves traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => {
            tracing::error!(error = %error, "Failed to install Prometheus exporter");
        }
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, outcome: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("outcome", outcome.to_string()),
    ];
    metrics::counter!("proxy_requests_total", &labels).increment(1);

    metrics::histogram!("proxy_request_duration_seconds", "outcome" => outcome.to_string())
        .record(start.elapsed().as_secs_f64());
}
