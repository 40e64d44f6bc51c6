//! Fetch → polite delay → extract → export, one page per run.

use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::clock::{Clock, DelayPolicy, SystemClock, UniformDelay};
use crate::config::AppConfig;
use crate::error::{ConfigError, FetchError, ScrapeError};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::models::{ExportReport, ProductRecord, ScrapeOutcome};
use crate::processor::{ProductExtractor, resolver_from_config};
use crate::storage::{Exporter, FileExporter, OutputNames};

pub struct Orchestrator {
    fetcher: Arc<dyn PageFetcher>,
    extractor: ProductExtractor,
    exporter: Arc<dyn Exporter>,
    delay: Arc<dyn DelayPolicy>,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: ProductExtractor,
        exporter: Arc<dyn Exporter>,
        delay: Arc<dyn DelayPolicy>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            exporter,
            delay,
        }
    }

    /// Wire up the production collaborators described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, OrchestratorBuildError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let fetcher = HttpFetcher::new(config.fetch.clone())?;
        let extractor = ProductExtractor::new(
            &config.selectors,
            resolver_from_config(&config.origin),
            Arc::clone(&clock),
        );
        let exporter = FileExporter::new(config.export.output_dir.clone(), clock);
        let delay = UniformDelay::new(config.delay.min_seconds, config.delay.max_seconds)?;

        Ok(Self::new(
            Arc::new(fetcher),
            extractor,
            Arc::new(exporter),
            Arc::new(delay),
        ))
    }

    /// Run the whole pipeline for one URL; every failure becomes an outcome
    pub async fn scrape_and_save(&self, url: &str, names: &OutputNames) -> ScrapeOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("scrape", %run_id, url);

        async {
            info!("🚀 Starting scrape for: {}", url);
            match self.run(url, names).await {
                Ok((records, report)) => {
                    info!("✅ {}", report.message);
                    ScrapeOutcome::succeeded(records, report)
                }
                Err(e) => {
                    error!("❌ {}", e);
                    ScrapeOutcome::failed(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        url: &str,
        names: &OutputNames,
    ) -> Result<(Vec<ProductRecord>, ExportReport), ScrapeError> {
        let page = self.fetcher.fetch(url).await?;

        let pause = self.delay.next_delay();
        if !pause.is_zero() {
            info!("⏳ Polite delay: {:.2} seconds", pause.as_secs_f64());
            tokio::time::sleep(pause).await;
        }

        info!("🔍 Parsing products...");
        let records = self.extractor.extract_page(&page.body, Some(&page.final_url));
        if records.is_empty() {
            return Err(ScrapeError::NoProducts);
        }
        info!("Found {} products", records.len());

        info!("💾 Saving data...");
        let report = self.exporter.export(&records, names)?;
        Ok((records, report))
    }
}

/// Failure while assembling the production pipeline
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorBuildError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
