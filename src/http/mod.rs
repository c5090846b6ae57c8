//! HTTP request instrumentation subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → middleware.rs (RequestContext: trace ID + start instant)
//!     → skip.rs (prefix / regex skip list)
//!     → capture.rs (headers, query, body → safely serialized snapshot)
//!     → handler
//!     → capture.rs (response body)
//!     → logger registry (one `req` record)
//!     → X-Request-Id response header (always)
//! ```

pub mod capture;
pub mod context;
pub mod middleware;
pub mod server;
pub mod skip;

pub use context::{new_trace_id, RequestContext};
pub use middleware::{
    request_logging_middleware, set_trace_header, RequestLogging, REQUEST_ID_HEADER, X_REQUEST_ID,
};
pub use server::HttpServer;
pub use skip::SkipList;
