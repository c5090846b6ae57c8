//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → used once at start-up to build the registry and middleware
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; loggers are never reconfigured
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CategoryLevels, InstrumentationConfig, LogFormat, LoggerConfig, LoggingConfig,
    ObservabilityConfig, ServerConfig, TelemetryConfig,
};
pub use validation::{validate_config, ValidationError};
