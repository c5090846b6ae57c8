//! The record handed to a log emitter.

use serde::Serialize;

use crate::logger::category::{LogCategory, Severity};
use crate::logger::extra::Fields;

/// One validated, normalized log event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Fixed logger name, e.g. `jf_service_req`.
    pub logger: String,

    /// Category tag of the logger. Serialized as `cate`; a sub-type `cate`
    /// of call/middleware/mq records lives inside `fields`.
    #[serde(rename = "cate")]
    pub category: LogCategory,

    pub level: Severity,

    pub message: String,

    /// Normalized extra attributes, in schema order.
    pub fields: Fields,
}

impl LogRecord {
    /// Look up a normalized field.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    /// String value of a field, `None` when absent or not a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Fields rendered as one compact JSON object.
    pub fn fields_json(&self) -> String {
        serde_json::Value::Object(self.fields.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_category_as_cate() {
        let mut fields = Fields::new();
        fields.insert("cate".into(), json!("intern"));
        let record = LogRecord {
            logger: "jf_service_call".into(),
            category: LogCategory::Call,
            level: Severity::Info,
            message: "call info".into(),
            fields,
        };

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["cate"], json!("call"));
        assert_eq!(encoded["fields"]["cate"], json!("intern"));
        assert_eq!(record.field_str("cate"), Some("intern"));
        assert_eq!(record.fields_json(), r#"{"cate":"intern"}"#);
    }
}
