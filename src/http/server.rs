//! Demo HTTP server with request logging installed.
//!
//! # Responsibilities
//! - Create Axum Router with sample handlers
//! - Wire up middleware (tracing, body timeout, request logging, timeout)
//! - Bind server to listener and shut down gracefully
//!
//! Handlers show how application code joins the request's trace ID
//! through `Extension<RequestContext>`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::config::LoggerConfig;
use crate::http::context::RequestContext;
use crate::http::middleware::RequestLogging;
use crate::logger::extra::BizExtra;
use crate::logger::registry::LoggerRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LoggerRegistry>,
}

/// Demo server.
pub struct HttpServer {
    router: Router,
    config: LoggerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: LoggerConfig, registry: Arc<LoggerRegistry>) -> Result<Self, regex::Error> {
        let logging = RequestLogging::new(registry.clone(), &config.instrumentation)?;
        let state = AppState { registry };
        let router = Self::build_router(&config, logging, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: tracing, request body idle timeout, request logging,
    /// request timeout. A timed-out request still gets its record and header.
    fn build_router(config: &LoggerConfig, logging: RequestLogging, state: AppState) -> Router {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);
        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/echo", post(echo_handler))
            .route("/biz", get(biz_handler))
            .route("/sleep/{ms}", get(sleep_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));

        logging
            .install(routes)
            .layer(RequestBodyTimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for `oneshot` tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Returns the request body unchanged, with the same content type.
async fn echo_handler(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    ([(header::CONTENT_TYPE, content_type)], body)
}

/// Logs a business event correlated with the request.
async fn biz_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Json<Value> {
    let extra = BizExtra::new()
        .trace_id(ctx.trace_id.clone())
        .duration(ctx.elapsed_secs());
    if let Err(e) = state.registry.biz().info("biz handler called", &extra) {
        tracing::warn!(error = %e, "Failed to emit biz log");
    }
    Json(json!({ "trace_id": ctx.trace_id }))
}

/// Answers after `ms` milliseconds.
async fn sleep_handler(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}
