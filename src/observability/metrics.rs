//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bootstrap_connections_accepted_total` (counter): accepted connections by listener
//! - `bootstrap_accept_retries_total` (counter): transient accept errors by listener
//! - `bootstrap_listener_failures_total` (counter): listeners that terminated the group

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const CONNECTIONS_ACCEPTED: &str = "bootstrap_connections_accepted_total";
pub const ACCEPT_RETRIES: &str = "bootstrap_accept_retries_total";
pub const LISTENER_FAILURES: &str = "bootstrap_listener_failures_total";

/// Start the Prometheus scrape endpoint on `addr`. Must run inside a tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_connection_accepted(listener: &str) {
    ::metrics::counter!(CONNECTIONS_ACCEPTED, "listener" => listener.to_string()).increment(1);
}

pub fn record_accept_retry(listener: &str) {
    ::metrics::counter!(ACCEPT_RETRIES, "listener" => listener.to_string()).increment(1);
}

pub fn record_listener_failure(name: &str) {
    ::metrics::counter!(LISTENER_FAILURES, "listener" => name.to_string()).increment(1);
}
