//! Per-category extra attributes and their validation rules.
//!
//! Every log call carries one extra-attributes struct matching the logger's
//! category. [`Extra::normalize`] checks required fields and produces the
//! ordered field map attached to the record:
//! - required sub-type enums must be present
//! - `duration` (seconds) becomes integer milliseconds, rounded
//! - every declared field is present in the map; absent values are `null`
//! - free-form fields are taken verbatim (callers serialize them)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::logger::category::LogCategory;
use crate::logger::serialize::to_log_string;

/// Normalized, ordered field map of a record.
pub type Fields = Map<String, Value>;

/// Contract violations raised while normalizing extra attributes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A required field was not supplied.
    #[error("{category} log requires `{field}`")]
    MissingField {
        category: LogCategory,
        field: &'static str,
    },

    /// Duration is negative, NaN or infinite.
    #[error("{category} log duration must be finite and non-negative seconds, got {value}")]
    InvalidDuration { category: LogCategory, value: f64 },
}

/// Extra attributes bound to one log category.
pub trait Extra {
    /// Category whose logger accepts this type.
    const CATEGORY: LogCategory;

    /// Validate and convert into the record's field map.
    fn normalize(&self) -> Result<Fields, SchemaError>;
}

fn opt_str(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

fn duration_ms(category: LogCategory, duration: Option<f64>) -> Result<Value, SchemaError> {
    match duration {
        None => Ok(Value::Null),
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            Ok(Value::from((secs * 1000.0).round() as i64))
        }
        Some(value) => Err(SchemaError::InvalidDuration { category, value }),
    }
}

fn required<T: Copy>(
    category: LogCategory,
    field: &'static str,
    value: Option<T>,
) -> Result<T, SchemaError> {
    value.ok_or(SchemaError::MissingField { category, field })
}

macro_rules! sub_type {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

sub_type! {
    /// Whether an outbound call targets an internal or external service.
    CallType { Intern => "intern", Extern => "extern" }
}

sub_type! {
    /// Storage or cache middleware being talked to.
    MiddlewareType {
        MySql => "mysql",
        Mongo => "mongo",
        Redis => "redis",
        Es => "es",
        Postgres => "postgres",
    }
}

sub_type! {
    /// Message broker flavour.
    MqType { Mq => "mq", Mqtt => "mqtt", Kafka => "kafka", RabbitMq => "rabbitmq" }
}

sub_type! {
    /// Direction of a message-queue interaction.
    MqHandleType { Send => "send", Listen => "listen" }
}

/// Business event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BizExtra {
    pub trace_id: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
}

impl BizExtra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }
}

impl Extra for BizExtra {
    const CATEGORY: LogCategory = LogCategory::Biz;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let mut fields = Fields::new();
        fields.insert("trace_id".into(), opt_str(&self.trace_id));
        fields.insert("duration".into(), duration_ms(Self::CATEGORY, self.duration)?);
        Ok(fields)
    }
}

/// Inbound HTTP request. Free-form fields are expected to be serialized
/// already.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReqExtra {
    pub trace_id: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
    pub method: Option<String>,
    pub path: Option<String>,
    pub client_ip: Option<String>,
    pub host: Option<String>,
    pub headers: Option<String>,
    pub query: Option<String>,
    pub body: Option<String>,
    pub resp: Option<String>,
}

impl Extra for ReqExtra {
    const CATEGORY: LogCategory = LogCategory::Req;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let mut fields = Fields::new();
        fields.insert("trace_id".into(), opt_str(&self.trace_id));
        fields.insert("duration".into(), duration_ms(Self::CATEGORY, self.duration)?);
        fields.insert("method".into(), opt_str(&self.method));
        fields.insert("path".into(), opt_str(&self.path));
        fields.insert("client_ip".into(), opt_str(&self.client_ip));
        fields.insert("host".into(), opt_str(&self.host));
        fields.insert("headers".into(), opt_str(&self.headers));
        fields.insert("query".into(), opt_str(&self.query));
        fields.insert("body".into(), opt_str(&self.body));
        fields.insert("resp".into(), opt_str(&self.resp));
        Ok(fields)
    }
}

/// Outbound call to another service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallExtra {
    /// Required.
    pub cate: Option<CallType>,
    pub call_params: Option<String>,
    pub call_resp: Option<String>,
}

impl CallExtra {
    pub fn new(cate: CallType) -> Self {
        Self {
            cate: Some(cate),
            ..Self::default()
        }
    }

    /// Attach call parameters, serializing them safely.
    pub fn call_params_from<T>(mut self, params: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        self.call_params = Some(to_log_string(params));
        self
    }

    /// Attach the call response, serializing it safely.
    pub fn call_resp_from<T>(mut self, resp: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        self.call_resp = Some(to_log_string(resp));
        self
    }
}

impl Extra for CallExtra {
    const CATEGORY: LogCategory = LogCategory::Call;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let cate = required(Self::CATEGORY, "cate", self.cate)?;
        let mut fields = Fields::new();
        fields.insert("cate".into(), Value::from(cate.as_str()));
        fields.insert("call_params".into(), opt_str(&self.call_params));
        fields.insert("call_resp".into(), opt_str(&self.call_resp));
        Ok(fields)
    }
}

/// Scheduled job run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CronExtra {
    pub job_group: Option<String>,
    pub job_code: Option<String>,
}

impl CronExtra {
    pub fn new(job_group: impl Into<String>, job_code: impl Into<String>) -> Self {
        Self {
            job_group: Some(job_group.into()),
            job_code: Some(job_code.into()),
        }
    }
}

impl Extra for CronExtra {
    const CATEGORY: LogCategory = LogCategory::Cron;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let mut fields = Fields::new();
        fields.insert("job_group".into(), opt_str(&self.job_group));
        fields.insert("job_code".into(), opt_str(&self.job_code));
        Ok(fields)
    }
}

/// Interaction with a storage or cache middleware.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiddlewareExtra {
    /// Required.
    pub cate: Option<MiddlewareType>,
    pub host: Option<String>,
}

impl MiddlewareExtra {
    pub fn new(cate: MiddlewareType) -> Self {
        Self {
            cate: Some(cate),
            host: None,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

impl Extra for MiddlewareExtra {
    const CATEGORY: LogCategory = LogCategory::Middleware;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let cate = required(Self::CATEGORY, "cate", self.cate)?;
        let mut fields = Fields::new();
        fields.insert("cate".into(), Value::from(cate.as_str()));
        fields.insert("host".into(), opt_str(&self.host));
        Ok(fields)
    }
}

/// Message-queue send or receive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MqExtra {
    /// Required.
    pub cate: Option<MqType>,
    /// Required.
    pub handle: Option<MqHandleType>,
}

impl MqExtra {
    pub fn new(cate: MqType, handle: MqHandleType) -> Self {
        Self {
            cate: Some(cate),
            handle: Some(handle),
        }
    }
}

impl Extra for MqExtra {
    const CATEGORY: LogCategory = LogCategory::Mq;

    fn normalize(&self) -> Result<Fields, SchemaError> {
        let cate = required(Self::CATEGORY, "cate", self.cate)?;
        let handle = required(Self::CATEGORY, "handle", self.handle)?;
        let mut fields = Fields::new();
        fields.insert("cate".into(), Value::from(cate.as_str()));
        fields.insert("handle".into(), Value::from(handle.as_str()));
        Ok(fields)
    }
}
