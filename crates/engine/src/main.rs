use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{BatchRunner, Engine, EngineConfig, LogFormat, LoggingConfig, Metrics};

const USAGE: &str = "usage: envrisk <requests.json> [config.json]";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let requests_path = args.next().context(USAGE)?;
    let config = match args.next() {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    init_tracing(&config.logging);

    let raw = tokio::fs::read_to_string(&requests_path)
        .await
        .with_context(|| format!("failed to read requests file {}", requests_path))?;
    let requests: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("requests file must contain a JSON array")?;

    let engine = Arc::new(Engine::new(&config));
    let metrics = Metrics::new();
    let runner = BatchRunner::new(engine, metrics.clone(), &config.concurrency);

    let responses = runner.run(requests).await?;
    println!("{}", serde_json::to_string_pretty(&responses)?);

    let snapshot = serde_json::to_string(&metrics.snapshot())?;
    info!(metrics = %snapshot, "Batch metrics");

    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
