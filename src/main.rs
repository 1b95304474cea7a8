use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pihole_statsd::{Pipeline, Scheduler, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::load().context("Failed to load configuration")?;
    info!(
        "Forwarding stats from {} to {}:{} (debug: {})",
        settings.api_host, settings.metrics_host, settings.metrics_port, settings.debug
    );

    let pipeline = Pipeline::from_settings(&settings).await.with_context(|| {
        format!(
            "Failed to open socket to {}:{}",
            settings.metrics_host, settings.metrics_port
        )
    })?;

    // Runs until the process is terminated.
    Scheduler::new(pipeline, settings.poll_interval())
        .start()
        .join()
        .await;

    Ok(())
}
