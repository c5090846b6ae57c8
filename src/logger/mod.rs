//! Category-scoped structured logging.
//!
//! # Data Flow
//! ```text
//! Caller builds XxxExtra
//!     → registry.rs (category logger bound to name + level)
//!     → extra.rs (validate required fields, normalize duration)
//!     → record.rs (LogRecord: logger, cate, level, message, fields)
//!     → emitter.rs (tracing event or in-memory buffer)
//! ```
//!
//! Free-form values go through serialize.rs before they are placed in an
//! extra, never after.

pub mod category;
pub mod emitter;
pub mod extra;
pub mod record;
pub mod registry;
pub mod serialize;

pub use category::{LogCategory, Severity};
pub use emitter::{LogEmitter, MemoryEmitter, TracingEmitter};
pub use extra::{
    BizExtra, CallExtra, CallType, CronExtra, Extra, Fields, MiddlewareExtra, MiddlewareType,
    MqExtra, MqHandleType, MqType, ReqExtra, SchemaError,
};
pub use record::LogRecord;
pub use registry::{CategoryLogger, LoggerRegistry};
pub use serialize::{bytes_to_log_string, to_log_string};
