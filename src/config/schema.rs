//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::logger::category::{LogCategory, Severity};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggerConfig {
    /// Category logger names and levels.
    pub logging: LoggingConfig,

    /// Request instrumentation settings.
    pub instrumentation: InstrumentationConfig,

    /// AI model telemetry client.
    pub telemetry: TelemetryConfig,

    /// Diagnostics output and metrics.
    pub observability: ObservabilityConfig,

    /// Demo server settings.
    pub server: ServerConfig,
}

/// Category logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Prefix of every logger name (`<prefix>_biz`, `<prefix>_req`, ...).
    pub service_prefix: String,

    /// Minimum level per category.
    pub levels: CategoryLevels,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_prefix: "jf_service".to_string(),
            levels: CategoryLevels::default(),
        }
    }
}

/// Minimum emitted level for each category.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryLevels {
    pub biz: Severity,
    pub req: Severity,
    pub call: Severity,
    pub cron: Severity,
    pub middleware: Severity,
    pub mq: Severity,
}

impl CategoryLevels {
    pub fn get(&self, category: LogCategory) -> Severity {
        match category {
            LogCategory::Biz => self.biz,
            LogCategory::Req => self.req,
            LogCategory::Call => self.call,
            LogCategory::Cron => self.cron,
            LogCategory::Middleware => self.middleware,
            LogCategory::Mq => self.mq,
        }
    }
}

/// Request instrumentation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Path prefixes whose requests are not logged.
    pub skip_routes: Vec<String>,

    /// Regexes (matched from the start of the path) whose requests are not logged.
    pub skip_regexes: Vec<String>,

    /// Headers injected by the hosting environment, stripped from logged headers.
    pub env_headers: Vec<String>,

    /// Largest request or response body captured into a record, in bytes.
    pub max_body_bytes: usize,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            skip_routes: Vec::new(),
            skip_regexes: Vec::new(),
            env_headers: default_env_headers(),
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Headers added by the ingress in front of the service.
pub fn default_env_headers() -> Vec<String> {
    [
        "X-Real-Ip",
        "X-Forwarded-Host",
        "X-Forwarded-Port",
        "X-Forwarded-Proto",
        "X-Forwarded-Scheme",
        "X-Scheme",
        "X-Original-Forwarded-For",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

/// AI model telemetry client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Collector endpoint. Empty disables sending.
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 5,
        }
    }
}

/// Output format of the diagnostics subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error or a full EnvFilter).
    pub log_level: String,

    /// JSON for production, pretty for development.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Demo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: LoggerConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.service_prefix, "jf_service");
        assert_eq!(config.telemetry.timeout_secs, 5);
        assert_eq!(config.instrumentation.max_body_bytes, 1024 * 1024);
        assert!(!config.instrumentation.env_headers.is_empty());
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml() {
        let config: LoggerConfig = toml::from_str(
            r#"
            [logging]
            service_prefix = "orders"

            [logging.levels]
            req = "info"
            mq = "warn"

            [instrumentation]
            skip_routes = ["/health"]
            skip_regexes = ["/static/.*"]

            [observability]
            log_format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.service_prefix, "orders");
        assert_eq!(config.logging.levels.get(LogCategory::Req), Severity::Info);
        assert_eq!(config.logging.levels.get(LogCategory::Mq), Severity::Warning);
        assert_eq!(config.logging.levels.get(LogCategory::Biz), Severity::Debug);
        assert_eq!(config.instrumentation.skip_routes, vec!["/health"]);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }
}
