//! Authentication gateway server.
//!
//! HTTP surface for the `token_gate` library: account endpoints, the
//! cookie-based token guard, configuration, logging and metrics.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
