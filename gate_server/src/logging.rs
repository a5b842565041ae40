//! Structured logging configuration.
//!
//! This module provides structured logging with request correlation and
//! security event tracking for credential checks.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var. Records emitted
/// through the `log` facade by the `token_gate` library are bridged into the
/// same subscriber.
///
/// # Example
///
/// ```no_run
/// use gate_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,tower_http=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `request_id` - Optional request correlation ID
/// * `user_id` - Optional subject identifier
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use gate_server::logging::log_security_event;
///
/// log_security_event(
///     "authentication_failed",
///     Some("5f0c..."),
///     None,
///     "Both credentials rejected",
/// );
/// ```
pub fn log_security_event(
    event_type: &str,
    request_id: Option<&str>,
    user_id: Option<&str>,
    message: &str,
) {
    tracing::warn!(
        event_type = event_type,
        request_id = request_id,
        user_id = user_id,
        "SECURITY: {}",
        message
    );
}

/// Log API request/response
///
/// # Arguments
///
/// * `request_id` - Request correlation ID
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(
    request_id: &str,
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
) {
    tracing::info!(
        request_id = request_id,
        http_method = method,
        http_path = path,
        http_status = status_code,
        duration_ms = duration_ms,
        "API request completed"
    );
}
