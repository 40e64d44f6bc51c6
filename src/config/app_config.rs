use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::job_config::{JobSpec, default_jobs};
use super::selector_config::SelectorConfig;
use crate::error::ConfigError;

/// Top-level configuration for the scraper binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub delay: DelayConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default = "default_jobs")]
    pub jobs: Vec<JobSpec>,
}

/// HTTP request behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
}

/// Politeness pause between fetching and parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub poll_interval_seconds: u64,
}

/// How relative product/image links become absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    pub strategy: OriginStrategy,
    pub vendor_markers: Vec<VendorOrigin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginStrategy {
    /// Join against the fetched page's final URL
    PageUrl,
    /// Prepend a known storefront origin found in the block markup
    VendorMarkers,
}

/// A storefront recognized by a substring of its markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorOrigin {
    pub marker: String,
    pub origin: String,
}

impl VendorOrigin {
    pub fn new(marker: &str, origin: &str) -> Self {
        Self {
            marker: marker.to_string(),
            origin: origin.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_seconds: 2.0,
            max_seconds: 5.0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scraped_data"),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 60,
        }
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            strategy: OriginStrategy::PageUrl,
            vendor_markers: default_vendor_markers(),
        }
    }
}

/// Storefront markers in match priority order
pub fn default_vendor_markers() -> Vec<VendorOrigin> {
    vec![
        VendorOrigin::new("web-scraping.dev", "https://www.web-scraping.dev"),
        VendorOrigin::new("flipkart", "https://www.flipkart.com"),
        VendorOrigin::new("walmart", "https://www.walmart.com"),
        VendorOrigin::new("ebay", "https://www.ebay.com"),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            delay: DelayConfig::default(),
            export: ExportConfig::default(),
            scheduler: SchedulerConfig::default(),
            origin: OriginConfig::default(),
            selectors: SelectorConfig::default(),
            jobs: default_jobs(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: optional TOML file, then `SCRAPER__SECTION__KEY`
    /// environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path, "SCRAPER")
    }

    pub fn load_with_env_prefix(
        path: impl AsRef<Path>,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let layered = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = layered.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selectors.validate()?;
        crate::clock::UniformDelay::new(self.delay.min_seconds, self.delay.max_seconds)?;
        for job in &self.jobs {
            job.time_of_day()?;
        }
        Ok(())
    }

    pub fn enabled_jobs(&self) -> Vec<&JobSpec> {
        self.jobs.iter().filter(|job| job.enabled).collect()
    }
}
