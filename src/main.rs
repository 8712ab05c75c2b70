//! Timebox demo runner
//!
//! Walks through the cache, task aggregator and timers and prints what was
//! observed as JSON.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timebox::{demo, Config};

/// Main entry point for the demo runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Run every walkthrough
/// 4. Print the report to stdout
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timebox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting timebox demo");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}ms, timeout={}ms/cancel {}ms, interval={}ms/cancel {}ms, debounce={}ms",
        config.cache_ttl_ms,
        config.timeout_delay_ms,
        config.timeout_cancel_ms,
        config.interval_ms,
        config.interval_cancel_ms,
        config.debounce_ms
    );

    let report = demo::run(&config).await.context("demo run failed")?;
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{}", json);

    info!("Demo complete");
    Ok(())
}
