//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Category loggers and instrumentation produce:
//!     → logging.rs (tracing subscriber: JSON or pretty)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace ID flows from the middleware into every request record
//! - Metrics are cheap and disabled until a recorder is installed

pub mod logging;
pub mod metrics;
