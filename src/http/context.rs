//! Request-scoped context.
//!
//! # Responsibilities
//! - Generate a unique, time-ordered trace ID per request
//! - Record the high-resolution start instant
//!
//! # Design Decisions
//! - Stored in the request's extensions, never in shared state
//! - Handlers read it with `Extension<RequestContext>` to correlate their own logs

use std::time::Instant;
use uuid::Uuid;

/// Trace ID and start time of one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: String,
    pub started: Instant,
}

impl RequestContext {
    /// Start a new request: fresh trace ID, clock starts now.
    pub fn begin() -> Self {
        Self {
            trace_id: new_trace_id(),
            started: Instant::now(),
        }
    }

    /// Seconds since [`RequestContext::begin`].
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Time-ordered unique ID in 32-char lowercase hex form.
pub fn new_trace_id() -> String {
    Uuid::now_v7().simple().to_string()
}
