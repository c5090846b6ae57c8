use clap::Parser;
use serde_json::Value;
use std::time::Duration;

use svc_logger::http::new_trace_id;
use svc_logger::telemetry::{ModelInference, TelemetryClient};

#[derive(Parser)]
#[command(name = "ai-log")]
#[command(about = "Send one AI model inference record to the collector", long_about = None)]
struct Cli {
    /// Collector endpoint.
    #[arg(short, long)]
    url: String,

    /// Model name.
    #[arg(short, long)]
    name: String,

    /// Model version.
    #[arg(short, long, default_value = "1")]
    version: String,

    /// Input parameters (JSON, or plain text).
    #[arg(short, long, default_value = "")]
    param: String,

    /// Model output (JSON, or plain text).
    #[arg(short, long, default_value = "")]
    result: String,

    /// Inference time in milliseconds.
    #[arg(short, long, default_value_t = 0)]
    duration_ms: u64,

    /// Non-zero marks the inference as failed.
    #[arg(short, long, default_value_t = 0)]
    status: i32,

    /// Error message for failed inferences.
    #[arg(short, long, default_value = "")]
    error_msg: String,

    /// Trace ID; a fresh one is generated when omitted.
    #[arg(short, long)]
    trace_id: Option<String>,
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = TelemetryClient::new(&cli.url)?;

    let inference = ModelInference::new(
        cli.trace_id.unwrap_or_else(new_trace_id),
        cli.name,
        cli.version,
        &parse_value(&cli.param),
        &parse_value(&cli.result),
        Duration::from_millis(cli.duration_ms),
    )
    .failed(cli.status, cli.error_msg);

    if client.send(&inference).await {
        println!("sent {}", inference.trace_id);
        Ok(())
    } else {
        Err(format!("collector did not accept {}", inference.trace_id).into())
    }
}
