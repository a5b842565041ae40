//! Prometheus metrics for the authentication gateway.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until
//! [`init_metrics`] installs the Prometheus exporter.
//!
//! # Metrics
//!
//! - `http_requests_total{method,status}`
//! - `guard_decisions_total{outcome}`: admit, rotate, missing_credential,
//!   authentication_failed, internal
//! - `login_attempts_total{success}`
//! - `registrations_total`

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Record HTTP request.
pub fn http_requests_total(method: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a token guard decision.
pub fn guard_decisions_total(outcome: &'static str) {
    metrics::counter!("guard_decisions_total", "outcome" => outcome).increment(1);
}

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment successful registrations counter.
pub fn registrations_total() {
    metrics::counter!("registrations_total").increment(1);
}
