//! Log sinks.
//!
//! # Responsibilities
//! - Accept validated records from category loggers
//! - Hide the concrete sink (tracing subscriber, in-memory buffer)
//!
//! # Design Decisions
//! - Emission never fails from the caller's point of view
//! - Durability and backpressure belong to the sink, not the logger

use std::sync::{Arc, Mutex, MutexGuard};

use crate::logger::category::Severity;
use crate::logger::record::LogRecord;

/// Target used for category records forwarded to `tracing`.
pub const RECORD_TARGET: &str = "svc_logger::record";

/// Sink receiving every emitted record.
pub trait LogEmitter: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Forwards records as `tracing` events.
///
/// The installed subscriber decides the output format; see
/// [`crate::observability::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

macro_rules! record_event {
    ($level:expr, $record:ident, $fields:ident) => {
        tracing::event!(
            target: RECORD_TARGET,
            $level,
            logger = %$record.logger,
            cate = %$record.category,
            severity = %$record.level,
            fields = %$fields,
            "{}",
            $record.message
        )
    };
}

impl LogEmitter for TracingEmitter {
    fn emit(&self, record: &LogRecord) {
        let fields = record.fields_json();
        match record.level {
            Severity::Debug => record_event!(tracing::Level::DEBUG, record, fields),
            Severity::Info => record_event!(tracing::Level::INFO, record, fields),
            Severity::Warning => record_event!(tracing::Level::WARN, record, fields),
            Severity::Error | Severity::Critical => {
                record_event!(tracing::Level::ERROR, record, fields)
            }
        }
    }
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryEmitter {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        // A panic while holding the lock cannot leave a Vec half-written.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of all captured records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Captured records emitted by the named logger.
    pub fn records_for(&self, logger: &str) -> Vec<LogRecord> {
        self.lock()
            .iter()
            .filter(|r| r.logger == logger)
            .cloned()
            .collect()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl LogEmitter for MemoryEmitter {
    fn emit(&self, record: &LogRecord) {
        self.lock().push(record.clone());
    }
}

impl<E: LogEmitter + ?Sized> LogEmitter for Arc<E> {
    fn emit(&self, record: &LogRecord) {
        (**self).emit(record)
    }
}
