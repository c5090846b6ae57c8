//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that skip regexes compile and skip routes are paths
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::LoggerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logging.service_prefix must be non-empty and contain only [A-Za-z0-9_], got {0:?}")]
    InvalidServicePrefix(String),

    #[error("instrumentation.skip_routes entry {0:?} must start with '/'")]
    InvalidSkipRoute(String),

    #[error("instrumentation.skip_regexes entry {pattern:?} does not compile: {reason}")]
    InvalidSkipRegex { pattern: String, reason: String },

    #[error("instrumentation.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("telemetry.url {url:?} is invalid: {reason}")]
    InvalidTelemetryUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.logging.service_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        errors.push(ValidationError::InvalidServicePrefix(prefix.clone()));
    }

    let instrumentation = &config.instrumentation;
    for route in &instrumentation.skip_routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::InvalidSkipRoute(route.clone()));
        }
    }
    for pattern in &instrumentation.skip_regexes {
        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(ValidationError::InvalidSkipRegex {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }
    if instrumentation.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let telemetry = &config.telemetry;
    if !telemetry.url.is_empty() {
        match url::Url::parse(&telemetry.url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            Ok(u) => errors.push(ValidationError::InvalidTelemetryUrl {
                url: telemetry.url.clone(),
                reason: format!("unsupported scheme {:?}", u.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidTelemetryUrl {
                url: telemetry.url.clone(),
                reason: e.to_string(),
            }),
        }
    }
    if telemetry.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("telemetry.timeout_secs"));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("server.request_timeout_secs"));
    }
    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
