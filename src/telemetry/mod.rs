//! AI model inference telemetry.
//!
//! # Data Flow
//! ```text
//! ModelInference (types.rs, param/result safely serialized)
//!     → InferencePayload (camelCase JSON, time + busTime in ms)
//!     → client.rs (POST, 5s timeout)
//!     → bool: collector answered 200
//! ```

pub mod client;
pub mod types;

pub use client::TelemetryClient;
pub use types::{InferencePayload, ModelInference};
