use anyhow::{Context, Result};
use catalog_scraper::clock::SystemClock;
use catalog_scraper::config::AppConfig;
use catalog_scraper::pipeline::Orchestrator;
use catalog_scraper::scheduler::{Scheduler, shutdown_signal};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "scraper.toml";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("🚀 Starting product scraper scheduler");

    let config = AppConfig::load(DEFAULT_CONFIG)
        .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG))?;
    let orchestrator = Orchestrator::from_config(&config).context("Failed to build scraper")?;

    let mut scheduler = Scheduler::new(
        &config.jobs,
        Arc::new(orchestrator),
        Arc::new(SystemClock),
        config.scheduler.poll_interval(),
    )
    .context("Failed to register scheduled jobs")?;

    if scheduler.job_count() == 0 {
        info!("⚠️ No enabled jobs; waiting for shutdown");
    }

    scheduler.run_until(shutdown_signal()).await;
    info!("👋 Scheduler exited");
    Ok(())
}
