//! Metrics collection and exposition.
//!
//! # Metrics
//! - `svc_logger_records_total` (counter): emitted records by category, level
//! - `svc_logger_schema_violations_total` (counter): rejected log calls by category
//! - `svc_logger_requests_skipped_total` (counter): requests on skip-listed routes
//! - `svc_logger_request_duration_seconds` (histogram): instrumented request latency
//! - `svc_logger_telemetry_sends_total` (counter): AI telemetry posts by outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::logger::category::{LogCategory, Severity};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_emitted(category: LogCategory, level: Severity) {
    counter!(
        "svc_logger_records_total",
        "category" => category.as_str(),
        "level" => level.as_str()
    )
    .increment(1);
}

pub fn record_schema_violation(category: LogCategory) {
    counter!("svc_logger_schema_violations_total", "category" => category.as_str()).increment(1);
}

pub fn record_request_skipped() {
    counter!("svc_logger_requests_skipped_total").increment(1);
}

pub fn record_request_duration(secs: f64) {
    histogram!("svc_logger_request_duration_seconds").record(secs);
}

pub fn record_telemetry_send(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("svc_logger_telemetry_sends_total", "outcome" => outcome).increment(1);
}
