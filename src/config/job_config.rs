use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A daily scrape: what to fetch, when, and whether it is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub url: String,
    /// Local time of day, "HH:MM"
    pub time: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl JobSpec {
    pub fn new(name: &str, url: &str, time: &str, enabled: bool) -> Self {
        Self {
            url: url.to_string(),
            time: time.to_string(),
            name: name.to_string(),
            enabled,
        }
    }

    pub fn time_of_day(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").map_err(|_| {
            ConfigError::InvalidJobTime {
                job: self.name.clone(),
                time: self.time.clone(),
            }
        })
    }
}

/// Jobs used when the config file does not define any
pub fn default_jobs() -> Vec<JobSpec> {
    vec![
        JobSpec::new(
            "Web Scraping Daily Job",
            "https://www.web-scraping.dev/products",
            "23:30",
            true,
        ),
        JobSpec::new(
            "Flipkart Laptops Daily Job",
            "https://www.flipkart.com/search?q=laptop",
            "14:00",
            false,
        ),
        JobSpec::new(
            "Walmart Laptops Daily Job",
            "https://www.walmart.com/search?q=laptop",
            "18:00",
            false,
        ),
    ]
}
