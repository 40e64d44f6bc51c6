use anyhow::{Context, Result};
use catalog_scraper::config::AppConfig;
use catalog_scraper::clock::SystemClock;
use catalog_scraper::models::ScrapeOutcome;
use catalog_scraper::pipeline::Orchestrator;
use catalog_scraper::scheduler::{Scheduler, shutdown_signal};
use catalog_scraper::storage::OutputNames;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "catalog-scraper")]
#[command(about = "Scrape product listing pages into CSV and Excel files")]
#[command(version)]
struct Cli {
    /// TOML config file; missing file means built-in defaults
    #[arg(long, global = true, default_value = "scraper.toml", env = "SCRAPER_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape one listing page now
    Scrape {
        url: String,

        #[arg(long, help = "CSV file name inside the output directory")]
        csv: Option<String>,

        #[arg(long, help = "Excel file name inside the output directory")]
        xlsx: Option<String>,

        #[arg(long, help = "Print the whole outcome as JSON")]
        json: bool,
    },
    /// Run the daily jobs until Ctrl+C
    Schedule,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Scrape {
            url,
            csv,
            xlsx,
            json,
        } => {
            let orchestrator =
                Orchestrator::from_config(&config).context("Failed to build scraper")?;
            let names = OutputNames::new(csv.as_deref(), xlsx.as_deref());
            let outcome = orchestrator.scrape_and_save(&url, &names).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_summary(&outcome);
            }

            Ok(if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Schedule => {
            run_schedule(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_schedule(config: &AppConfig) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config).context("Failed to build scraper")?;
    let mut scheduler = Scheduler::new(
        &config.jobs,
        Arc::new(orchestrator),
        Arc::new(SystemClock),
        config.scheduler.poll_interval(),
    )
    .context("Failed to register scheduled jobs")?;

    info!("Press Ctrl+C to stop");
    scheduler.run_until(shutdown_signal()).await;
    Ok(())
}

fn print_summary(outcome: &ScrapeOutcome) {
    if !outcome.success {
        println!("❌ {}", outcome.message);
        return;
    }

    println!("✅ {}", outcome.message);
    println!("📊 Total products: {}", outcome.count);
    println!();

    for (index, record) in outcome.records.iter().take(PREVIEW_ROWS).enumerate() {
        println!("Product {}:", index + 1);
        for (field, value) in record.iter() {
            if field.is_stamp() {
                continue;
            }
            if let Some(value) = value {
                println!("  {:<16} {}", field.as_str(), value);
            }
        }
        println!();
    }

    if outcome.count > PREVIEW_ROWS {
        println!("... and {} more", outcome.count - PREVIEW_ROWS);
    }
}
