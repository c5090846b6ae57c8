//! AI model inference log payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::logger::serialize::to_log_string;

/// One model inference, as reported by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInference {
    pub trace_id: String,
    /// Model name.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Input parameters, safely serialized.
    pub param: String,
    /// Output, safely serialized.
    pub result: String,
    /// Inference time.
    pub duration: Duration,
    /// 0 for success, anything else for failure.
    pub status: i32,
    pub error_msg: String,
}

impl ModelInference {
    /// A successful inference; `param` and `result` are serialized safely.
    pub fn new<P, R>(
        trace_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        param: &P,
        result: &R,
        duration: Duration,
    ) -> Self
    where
        P: Serialize + fmt::Debug + ?Sized,
        R: Serialize + fmt::Debug + ?Sized,
    {
        Self {
            trace_id: trace_id.into(),
            name: name.into(),
            version: version.into(),
            param: to_log_string(param),
            result: to_log_string(result),
            duration,
            status: 0,
            error_msg: String::new(),
        }
    }

    /// Mark as failed with a non-zero status.
    pub fn failed(mut self, status: i32, error_msg: impl Into<String>) -> Self {
        self.status = status;
        self.error_msg = error_msg.into();
        self
    }

    /// Wire payload, stamped with the current wall-clock time.
    pub fn to_payload(&self) -> InferencePayload {
        let bus_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;
        self.to_payload_at(bus_time)
    }

    /// Wire payload with an explicit `busTime` (epoch milliseconds).
    pub fn to_payload_at(&self, bus_time: i64) -> InferencePayload {
        InferencePayload {
            trace_id: self.trace_id.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            param: self.param.clone(),
            result: self.result.clone(),
            status: self.status,
            error_msg: self.error_msg.clone(),
            time: self.duration.as_millis() as i64,
            bus_time,
        }
    }
}

/// JSON body posted to the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferencePayload {
    pub trace_id: String,
    pub name: String,
    pub version: String,
    pub param: String,
    pub result: String,
    pub status: i32,
    pub error_msg: String,
    /// Inference time in whole milliseconds (truncated).
    pub time: i64,
    /// Epoch milliseconds at send time.
    pub bus_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_field_names() {
        let inference = ModelInference::new(
            "t-1",
            "ranker",
            "v2",
            &json!({"q": "shoes"}),
            &json!([0.9, 0.1]),
            Duration::from_micros(1_234_567),
        )
        .failed(2, "model overloaded");

        let encoded = serde_json::to_value(inference.to_payload_at(1_700_000_000_000)).unwrap();
        assert_eq!(
            encoded,
            json!({
                "traceId": "t-1",
                "name": "ranker",
                "version": "v2",
                "param": "{\"q\":\"shoes\"}",
                "result": "[0.9,0.1]",
                "status": 2,
                "errorMsg": "model overloaded",
                "time": 1234,
                "busTime": 1_700_000_000_000i64,
            })
        );
    }

    #[test]
    fn test_string_param_not_quoted() {
        let inference =
            ModelInference::new("t", "m", "1", "prompt", "answer", Duration::from_millis(5));
        assert_eq!(inference.param, "prompt");
        assert_eq!(inference.result, "answer");
        assert_eq!(inference.status, 0);
        assert!(inference.error_msg.is_empty());
    }

    #[test]
    fn test_bus_time_is_now() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        let payload =
            ModelInference::new("t", "m", "1", "p", "r", Duration::ZERO).to_payload();
        assert!(payload.bus_time >= before);
        assert_eq!(payload.time, 0);
    }
}
