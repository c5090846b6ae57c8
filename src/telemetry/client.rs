//! HTTP client for the AI model log collector.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::schema::TelemetryConfig;
use crate::observability::metrics;
use crate::telemetry::types::ModelInference;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts inference records to a collector. No retries: the caller decides
/// what to do with a `false`.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    client: Client,
    url: Option<String>,
}

impl TelemetryClient {
    /// Client for `url` with the default 5 second timeout.
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let url = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
        Ok(Self { client, url })
    }

    /// Client from configuration; an empty URL yields a disabled client.
    pub fn from_config(config: &TelemetryConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(&config.url, Duration::from_secs(config.timeout_secs))
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Send one record. True only when the collector answers 200.
    pub async fn send(&self, inference: &ModelInference) -> bool {
        let Some(url) = &self.url else {
            tracing::debug!(trace_id = %inference.trace_id, "Telemetry disabled, record dropped");
            return false;
        };

        let payload = inference.to_payload();
        let success = match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => true,
            Ok(resp) => {
                tracing::debug!(
                    trace_id = %inference.trace_id,
                    status = %resp.status(),
                    "Telemetry collector rejected record"
                );
                false
            }
            Err(e) => {
                tracing::debug!(trace_id = %inference.trace_id, error = %e, "Telemetry send failed");
                false
            }
        };
        metrics::record_telemetry_send(success);
        success
    }
}
