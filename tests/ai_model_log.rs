//! AI model telemetry client against a mock collector.

use serde_json::{json, Value};
use std::time::Duration;
use svc_logger::telemetry::{InferencePayload, ModelInference, TelemetryClient};

mod common;

fn inference() -> ModelInference {
    ModelInference::new(
        "trace-42",
        "intent-classifier",
        "3.1.0",
        &json!({"text": "where is my order"}),
        &json!({"label": "order_status", "score": 0.97}),
        Duration::from_millis(1530),
    )
}

#[tokio::test]
async fn test_send_success_posts_payload() {
    let (addr, mut received) = common::start_collector(200, Duration::ZERO).await;
    let client = TelemetryClient::new(&format!("http://{}/api/ai/log", addr)).unwrap();

    assert!(client.send(&inference()).await);

    let request = received.recv().await.expect("collector got nothing");
    assert_eq!(request.request_line, "POST /api/ai/log HTTP/1.1");
    assert!(request
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("application/json")));

    let payload: InferencePayload = serde_json::from_str(&request.body).unwrap();
    assert_eq!(payload.trace_id, "trace-42");
    assert_eq!(payload.name, "intent-classifier");
    assert_eq!(payload.version, "3.1.0");
    assert_eq!(payload.param, r#"{"text":"where is my order"}"#);
    assert_eq!(payload.result, r#"{"label":"order_status","score":0.97}"#);
    assert_eq!(payload.status, 0);
    assert_eq!(payload.error_msg, "");
    assert_eq!(payload.time, 1530);
    assert!(payload.bus_time > 1_600_000_000_000);

    let raw: Value = serde_json::from_str(&request.body).unwrap();
    for key in ["traceId", "errorMsg", "busTime"] {
        assert!(raw.get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_failed_inference_reported() {
    let (addr, mut received) = common::start_collector(200, Duration::ZERO).await;
    let client = TelemetryClient::new(&format!("http://{}/log", addr)).unwrap();

    let failed = inference().failed(1, "CUDA out of memory");
    assert!(client.send(&failed).await);

    let request = received.recv().await.unwrap();
    let payload: InferencePayload = serde_json::from_str(&request.body).unwrap();
    assert_eq!(payload.status, 1);
    assert_eq!(payload.error_msg, "CUDA out of memory");
}

#[tokio::test]
async fn test_non_200_is_failure() {
    for status in [201, 400, 500] {
        let (addr, _received) = common::start_collector(status, Duration::ZERO).await;
        let client = TelemetryClient::new(&format!("http://{}/log", addr)).unwrap();
        assert!(!client.send(&inference()).await, "status {} must fail", status);
    }
}

#[tokio::test]
async fn test_timeout_is_failure() {
    let (addr, _received) = common::start_collector(200, Duration::from_secs(3)).await;
    let client =
        TelemetryClient::with_timeout(&format!("http://{}/log", addr), Duration::from_millis(200))
            .unwrap();
    assert!(!client.send(&inference()).await);
}

#[tokio::test]
async fn test_unreachable_collector_is_failure() {
    let addr = common::unused_addr().await;
    let client = TelemetryClient::new(&format!("http://{}/log", addr)).unwrap();
    assert!(!client.send(&inference()).await);
}
