//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_login_total` (counter): login attempts by outcome
//! - `auth_logout_total` (counter): completed logouts
//! - `auth_session_rejected_total` (counter): requests refused by the session layer, by reason
//! - `auth_sessions_purged_total` (counter): expired sessions swept from the store

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_login(outcome: &'static str) {
    counter!("auth_login_total", "outcome" => outcome).increment(1);
}

pub fn record_logout() {
    counter!("auth_logout_total").increment(1);
}

pub fn record_session_rejected(reason: &'static str) {
    counter!("auth_session_rejected_total", "reason" => reason).increment(1);
}

pub fn record_sessions_purged(count: usize) {
    counter!("auth_sessions_purged_total").increment(count as u64);
}
