//! # Courier Demo Runtime
//!
//! Entry point for the demonstration binary. Initializes structured logging,
//! loads configuration from the environment, runs the three scenarios in
//! sequence, and prints each bus's statistics as JSON.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use courier_runtime::{scenarios, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("COURIER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = RuntimeConfig::from_env();

    info!("===========================================");
    info!("  Courier Demo Runtime v0.1.0");
    info!("===========================================");

    let stats = scenarios::simple(&config).await?;
    info!(
        scenario = "simple",
        stats = %serde_json::to_string(&stats).context("encode stats")?,
        "scenario complete"
    );

    let stats = scenarios::fanout(&config).await?;
    info!(
        scenario = "fanout",
        stats = %serde_json::to_string(&stats).context("encode stats")?,
        "scenario complete"
    );

    let stats = scenarios::pipeline(&config).await?;
    info!(
        scenario = "pipeline",
        stats = %serde_json::to_string(&stats).context("encode stats")?,
        "scenario complete"
    );

    info!("all scenarios complete");
    Ok(())
}
