//! svc-logger demo service.
//!
//! Loads configuration, installs the diagnostics subscriber, builds the
//! category logger registry and serves a small axum app with request logging
//! installed.
//!
//! ```text
//! svc-logger --config logger.toml
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use svc_logger::config::{load_config, LoggerConfig};
use svc_logger::http::HttpServer;
use svc_logger::lifecycle::{spawn_signal_handler, Shutdown};
use svc_logger::logger::{CronExtra, LoggerRegistry, TracingEmitter};
use svc_logger::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "svc-logger")]
#[command(about = "Demo service with category logging and request instrumentation")]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggerConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("svc-logger v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(LoggerRegistry::from_config(
        &config.logging,
        Arc::new(TracingEmitter),
    ));
    tracing::info!(
        service_prefix = %registry.service_prefix(),
        loggers = ?registry.logger_names(),
        "Logger registry ready"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    registry
        .cron()
        .info("service started", &CronExtra::new("lifecycle", "startup"))?;

    let server = HttpServer::new(config, registry)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
