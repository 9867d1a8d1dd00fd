//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hub_router_decisions_total` (counter): router outcomes by `outcome`
//! - `hub_upstream_responses_total` (counter): forwarded responses by `status`
//! - `hub_exports_total` (counter): exports by `kind`
//! - `hub_export_rows_total` (counter): exported rows by `kind`
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (no paths, no origins)

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    counter!("hub_router_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream(status: u16) {
    counter!("hub_upstream_responses_total", "status" => status.to_string()).increment(1);
}

pub fn record_export(kind: &'static str, rows: usize) {
    counter!("hub_exports_total", "kind" => kind).increment(1);
    counter!("hub_export_rows_total", "kind" => kind).increment(rows as u64);
}
