//! Request/response capture for request records.
//!
//! Everything here works on `http` types and buffered bytes. The middleware
//! wiring lives in `middleware.rs`.
//!
//! Body decoding order for requests: JSON, then form fields (url-encoded or
//! multipart), then raw text. Responses: JSON, then raw text.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, HeaderMap, Method, Uri};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::net::SocketAddr;

use crate::http::context::RequestContext;
use crate::logger::extra::ReqExtra;
use crate::logger::serialize::{bytes_to_log_string, to_log_string};

/// Decoded body, before serialization into a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(Map<String, Value>),
    Raw(String),
    /// Body not captured; the marker text is logged instead.
    Omitted(String),
}

impl Payload {
    pub fn to_log_string(&self) -> String {
        match self {
            Payload::Json(value) => to_log_string(value),
            Payload::Form(fields) => to_log_string(fields),
            Payload::Raw(text) | Payload::Omitted(text) => text.clone(),
        }
    }
}

/// Try to decode `bytes` as JSON.
pub fn decode_json(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Form fields, when the content type says so: url-encoded pairs, or the
/// text fields of a multipart body (file parts are skipped). First value
/// wins for repeated keys.
pub async fn decode_form(bytes: &Bytes, content_type: Option<&str>) -> Option<Map<String, Value>> {
    let content_type = content_type?;
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        Some(first_value_map(bytes))
    } else if mime.eq_ignore_ascii_case("multipart/form-data") {
        multipart_fields(bytes.clone(), content_type).await
    } else {
        None
    }
}

fn first_value_map(bytes: &[u8]) -> Map<String, Value> {
    let mut fields = Map::new();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        fields
            .entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    fields
}

async fn multipart_fields(bytes: Bytes, content_type: &str) -> Option<Map<String, Value>> {
    let req = axum::http::Request::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .ok()?;
    let mut multipart = Multipart::from_request(req, &()).await.ok()?;

    let mut fields = Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.text().await {
            Ok(text) => {
                fields.entry(name).or_insert(Value::String(text));
            }
            Err(_) => break,
        }
    }
    Some(fields)
}

/// Decode a request body: JSON (unless `null`), else non-empty form fields,
/// else the raw text.
pub async fn request_payload(bytes: &Bytes, content_type: Option<&str>) -> Payload {
    match decode_json(bytes) {
        Ok(Value::Null) | Err(_) => {}
        Ok(value) => return Payload::Json(value),
    }
    match decode_form(bytes, content_type).await {
        Some(fields) if !fields.is_empty() => Payload::Form(fields),
        _ => Payload::Raw(bytes_to_log_string(bytes)),
    }
}

/// Decode a response body: JSON, else the raw text.
pub fn response_payload(bytes: &[u8]) -> Payload {
    match decode_json(bytes) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Raw(bytes_to_log_string(bytes)),
    }
}

/// Lowercased set of header names to drop.
pub fn header_exclusions<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_ascii_lowercase())
        .collect()
}

/// Request headers as name → value, minus excluded names. Repeated headers
/// are joined with ", ".
pub fn collect_headers(headers: &HeaderMap, excluded: &HashSet<String>) -> Map<String, Value> {
    let mut collected: Map<String, Value> = Map::new();
    for (name, value) in headers {
        if excluded.contains(name.as_str()) {
            continue;
        }
        let value = bytes_to_log_string(value.as_bytes());
        match collected.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            _ => {
                collected.insert(name.as_str().to_string(), Value::String(value));
            }
        }
    }
    collected
}

/// Query parameters as key → value. First value wins for repeated keys.
pub fn collect_query(uri: &Uri) -> Map<String, Value> {
    uri.query()
        .map(|q| first_value_map(q.as_bytes()))
        .unwrap_or_default()
}

/// `X-Forwarded-For` when present, else the socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .map(|v| bytes_to_log_string(v.as_bytes()))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// `Host` header, else the URI authority.
pub fn host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::HOST)
        .map(|v| bytes_to_log_string(v.as_bytes()))
        .or_else(|| uri.authority().map(|a| a.to_string()))
}

/// Everything a request record needs from the inbound request, captured
/// before the handler consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot {
    pub method: String,
    pub path: String,
    pub client_ip: Option<String>,
    pub host: Option<String>,
    pub headers: String,
    pub query: String,
    pub body: String,
}

impl RequestSnapshot {
    pub fn capture(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
        body: &Payload,
        excluded_headers: &HashSet<String>,
    ) -> Self {
        Self {
            method: method.as_str().to_string(),
            path: uri.path().to_string(),
            client_ip: client_ip(headers, peer),
            host: host(headers, uri),
            headers: to_log_string(&collect_headers(headers, excluded_headers)),
            query: to_log_string(&collect_query(uri)),
            body: body.to_log_string(),
        }
    }

    /// Combine with the request context and response into a request extra.
    pub fn into_req_extra(self, ctx: &RequestContext, duration: f64, resp: &Payload) -> ReqExtra {
        ReqExtra {
            trace_id: Some(ctx.trace_id.clone()),
            duration: Some(duration),
            method: Some(self.method),
            path: Some(self.path),
            client_ip: self.client_ip,
            host: self.host,
            headers: Some(self.headers),
            query: Some(self.query),
            body: Some(self.body),
            resp: Some(resp.to_log_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    const FORM: Option<&str> = Some("application/x-www-form-urlencoded");

    async fn decode(body: &'static [u8], content_type: Option<&str>) -> Payload {
        request_payload(&Bytes::from_static(body), content_type).await
    }

    #[tokio::test]
    async fn test_json_body_decoded() {
        let payload = decode(br#"{"a": 1}"#, Some("application/json")).await;
        assert_eq!(payload, Payload::Json(json!({"a": 1})));
        assert_eq!(payload.to_log_string(), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_form_body_decoded() {
        let payload = decode(b"a=1&b=two+words&a=3", FORM).await;
        assert_eq!(payload.to_log_string(), r#"{"a":"1","b":"two words"}"#);
    }

    #[tokio::test]
    async fn test_form_ignored_without_form_content_type() {
        let payload = decode(b"a=1", Some("text/plain")).await;
        assert_eq!(payload, Payload::Raw("a=1".into()));
    }

    #[tokio::test]
    async fn test_raw_body_kept_as_text() {
        assert_eq!(decode(b"raw", None).await.to_log_string(), "raw");
        assert_eq!(decode(b"", FORM).await.to_log_string(), "");
        // JSON null is treated as "not JSON".
        assert_eq!(decode(b"null", None).await, Payload::Raw("null".into()));
    }

    #[tokio::test]
    async fn test_multipart_text_fields_decoded() {
        let body = concat!(
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"user\"\r\n\r\n",
            "alice\r\n",
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n",
            "Content-Type: image/png\r\n\r\n",
            "PNGDATA\r\n",
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"user\"\r\n\r\n",
            "bob\r\n",
            "--XyZ--\r\n",
        );
        let payload = decode(body.as_bytes(), Some("multipart/form-data; boundary=XyZ")).await;
        assert_eq!(payload.to_log_string(), r#"{"user":"alice"}"#);
    }

    #[tokio::test]
    async fn test_multipart_without_text_fields_is_raw() {
        let body = "--XyZ--\r\n";
        let payload = decode(body.as_bytes(), Some("multipart/form-data; boundary=XyZ")).await;
        assert_eq!(payload, Payload::Raw(body.into()));
    }

    #[test]
    fn test_response_payload() {
        assert_eq!(response_payload(br#"{"ok":true}"#).to_log_string(), r#"{"ok":true}"#);
        assert_eq!(response_payload(b"<html>").to_log_string(), "<html>");
    }

    #[test]
    fn test_headers_exclude_env_headers_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let excluded = header_exclusions(["X-Real-IP"]);
        let collected = collect_headers(&headers, &excluded);
        assert!(!collected.contains_key("x-real-ip"));
        assert_eq!(collected["content-type"], json!("application/json"));
        assert_eq!(collected["accept"], json!("text/html, application/json"));
    }

    #[test]
    fn test_query_first_value_wins() {
        let uri: Uri = "/search?q=rust&page=2&q=go".parse().unwrap();
        assert_eq!(to_log_string(&collect_query(&uri)), r#"{"q":"rust","page":"2"}"#);

        let uri: Uri = "/search".parse().unwrap();
        assert_eq!(to_log_string(&collect_query(&uri)), "{}");
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let peer: SocketAddr = "192.168.1.9:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(peer)), Some("192.168.1.9".into()));
        assert_eq!(client_ip(&headers, None), None);

        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        assert_eq!(client_ip(&headers, Some(peer)), Some("1.2.3.4".into()));
    }

    #[test]
    fn test_host_falls_back_to_authority() {
        let uri: Uri = "http://api.example.com:8080/x".parse().unwrap();
        assert_eq!(host(&HeaderMap::new(), &uri), Some("api.example.com:8080".into()));

        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("svc.local"));
        assert_eq!(host(&headers, &uri), Some("svc.local".into()));
    }

    #[test]
    fn test_snapshot_into_extra() {
        let uri: Uri = "/orders?id=7".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("5.6.7.8"));
        let snapshot = RequestSnapshot::capture(
            &Method::POST,
            &uri,
            &headers,
            None,
            &Payload::Json(json!({"a": 1})),
            &HashSet::new(),
        );

        let ctx = RequestContext::begin();
        let extra = snapshot.into_req_extra(&ctx, 0.25, &Payload::Raw("done".into()));
        assert_eq!(extra.trace_id.as_deref(), Some(ctx.trace_id.as_str()));
        assert_eq!(extra.method.as_deref(), Some("POST"));
        assert_eq!(extra.path.as_deref(), Some("/orders"));
        assert_eq!(extra.host.as_deref(), Some("5.6.7.8"));
        assert_eq!(extra.client_ip, None);
        assert_eq!(extra.headers.as_deref(), Some(r#"{"host":"5.6.7.8"}"#));
        assert_eq!(extra.query.as_deref(), Some(r#"{"id":"7"}"#));
        assert_eq!(extra.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(extra.resp.as_deref(), Some("done"));
        assert_eq!(extra.duration, Some(0.25));
    }
}
