//! Log categories and record severities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed log stream with its own schema and logger name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Biz,
    Req,
    Call,
    Cron,
    Middleware,
    Mq,
}

impl LogCategory {
    /// All categories, in registry order.
    pub const ALL: [LogCategory; 6] = [
        LogCategory::Biz,
        LogCategory::Req,
        LogCategory::Call,
        LogCategory::Cron,
        LogCategory::Middleware,
        LogCategory::Mq,
    ];

    /// Category tag carried by every record of this stream.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Biz => "biz",
            LogCategory::Req => "req",
            LogCategory::Call => "call",
            LogCategory::Cron => "cron",
            LogCategory::Middleware => "middleware",
            LogCategory::Mq => "mq",
        }
    }

    /// Logger name for this category under the given service prefix,
    /// e.g. `jf_service_biz`.
    pub fn logger_name(&self, service_prefix: &str) -> String {
        format!("{}_{}", service_prefix, self.as_str())
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for tracing::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Error | Severity::Critical => tracing::Level::ERROR,
        }
    }
}
