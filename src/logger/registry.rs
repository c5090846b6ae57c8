//! Category loggers and the registry holding them.
//!
//! # Responsibilities
//! - Bind each category to its logger name, minimum level and schema
//! - Validate extra attributes before anything reaches the emitter
//! - Hand validated records to the shared emitter
//!
//! # Design Decisions
//! - The extra type is a type parameter, so a logger only accepts its own schema
//! - Validation runs even for disabled levels
//! - Immutable after construction; shared via `Arc` without locking

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::schema::LoggingConfig;
use crate::logger::category::{LogCategory, Severity};
use crate::logger::emitter::LogEmitter;
use crate::logger::extra::{
    BizExtra, CallExtra, CronExtra, Extra, MiddlewareExtra, MqExtra, ReqExtra, SchemaError,
};
use crate::logger::record::LogRecord;
use crate::observability::metrics;

/// Logger for a single category, accepting only that category's extras.
pub struct CategoryLogger<E> {
    name: String,
    min_level: Severity,
    emitter: Arc<dyn LogEmitter>,
    _extra: PhantomData<fn(&E)>,
}

impl<E: Extra> CategoryLogger<E> {
    /// Create a logger named `<service_prefix>_<category>`.
    pub fn new(service_prefix: &str, min_level: Severity, emitter: Arc<dyn LogEmitter>) -> Self {
        Self {
            name: E::CATEGORY.logger_name(service_prefix),
            min_level,
            emitter,
            _extra: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> LogCategory {
        E::CATEGORY
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    /// Validate `extra` and emit one record.
    ///
    /// A schema violation aborts the call: nothing is emitted and the error is
    /// returned to the caller.
    pub fn log(&self, level: Severity, message: &str, extra: &E) -> Result<(), SchemaError> {
        let fields = match extra.normalize() {
            Ok(fields) => fields,
            Err(e) => {
                metrics::record_schema_violation(E::CATEGORY);
                return Err(e);
            }
        };

        if !self.is_enabled(level) {
            return Ok(());
        }

        let record = LogRecord {
            logger: self.name.clone(),
            category: E::CATEGORY,
            level,
            message: message.to_string(),
            fields,
        };
        self.emitter.emit(&record);
        metrics::record_emitted(E::CATEGORY, level);
        Ok(())
    }

    pub fn debug(&self, message: &str, extra: &E) -> Result<(), SchemaError> {
        self.log(Severity::Debug, message, extra)
    }

    pub fn info(&self, message: &str, extra: &E) -> Result<(), SchemaError> {
        self.log(Severity::Info, message, extra)
    }

    pub fn warning(&self, message: &str, extra: &E) -> Result<(), SchemaError> {
        self.log(Severity::Warning, message, extra)
    }

    pub fn error(&self, message: &str, extra: &E) -> Result<(), SchemaError> {
        self.log(Severity::Error, message, extra)
    }

    pub fn critical(&self, message: &str, extra: &E) -> Result<(), SchemaError> {
        self.log(Severity::Critical, message, extra)
    }
}

impl<E> Clone for CategoryLogger<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            min_level: self.min_level,
            emitter: self.emitter.clone(),
            _extra: PhantomData,
        }
    }
}

impl<E> fmt::Debug for CategoryLogger<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryLogger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

fn configured<E: Extra>(config: &LoggingConfig, emitter: Arc<dyn LogEmitter>) -> CategoryLogger<E> {
    CategoryLogger::new(
        &config.service_prefix,
        config.levels.get(E::CATEGORY),
        emitter,
    )
}

/// The six category loggers of a service, built once at start-up.
#[derive(Debug, Clone)]
pub struct LoggerRegistry {
    service_prefix: String,
    biz: CategoryLogger<BizExtra>,
    req: CategoryLogger<ReqExtra>,
    call: CategoryLogger<CallExtra>,
    cron: CategoryLogger<CronExtra>,
    middleware: CategoryLogger<MiddlewareExtra>,
    mq: CategoryLogger<MqExtra>,
}

impl LoggerRegistry {
    /// Registry with every category enabled from `debug` up.
    pub fn new(service_prefix: &str, emitter: Arc<dyn LogEmitter>) -> Self {
        let config = LoggingConfig {
            service_prefix: service_prefix.to_string(),
            ..LoggingConfig::default()
        };
        Self::from_config(&config, emitter)
    }

    pub fn from_config(config: &LoggingConfig, emitter: Arc<dyn LogEmitter>) -> Self {
        Self {
            service_prefix: config.service_prefix.clone(),
            biz: configured(config, emitter.clone()),
            req: configured(config, emitter.clone()),
            call: configured(config, emitter.clone()),
            cron: configured(config, emitter.clone()),
            middleware: configured(config, emitter.clone()),
            mq: configured(config, emitter),
        }
    }

    pub fn service_prefix(&self) -> &str {
        &self.service_prefix
    }

    pub fn biz(&self) -> &CategoryLogger<BizExtra> {
        &self.biz
    }

    pub fn req(&self) -> &CategoryLogger<ReqExtra> {
        &self.req
    }

    pub fn call(&self) -> &CategoryLogger<CallExtra> {
        &self.call
    }

    pub fn cron(&self) -> &CategoryLogger<CronExtra> {
        &self.cron
    }

    pub fn middleware(&self) -> &CategoryLogger<MiddlewareExtra> {
        &self.middleware
    }

    pub fn mq(&self) -> &CategoryLogger<MqExtra> {
        &self.mq
    }

    /// Logger names in category order.
    pub fn logger_names(&self) -> Vec<&str> {
        vec![
            self.biz.name(),
            self.req.name(),
            self.call.name(),
            self.cron.name(),
            self.middleware.name(),
            self.mq.name(),
        ]
    }
}
