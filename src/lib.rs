//! Category-scoped structured logging for service backends.
//!
//! Six fixed log streams (biz, req, call, cron, middleware, mq), each with a
//! validated schema, plus axum middleware that logs every request with a
//! trace ID and a client for AI model inference telemetry.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod telemetry;

pub use config::LoggerConfig;
pub use http::{RequestContext, RequestLogging};
pub use lifecycle::Shutdown;
pub use logger::{
    BizExtra, CallExtra, CallType, CronExtra, LogCategory, LogEmitter, LogRecord, LoggerRegistry,
    MemoryEmitter, MiddlewareExtra, MiddlewareType, MqExtra, MqHandleType, MqType, ReqExtra,
    SchemaError, Severity, TracingEmitter,
};
pub use telemetry::{ModelInference, TelemetryClient};
