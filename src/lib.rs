//! Scrape product listing pages into CSV and XLSX files, on demand or on a
//! daily schedule.

pub mod clock;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod scheduler;
pub mod storage;

pub use config::AppConfig;
pub use models::{Field, ProductRecord, ScrapeOutcome};
pub use pipeline::Orchestrator;
pub use scheduler::{JobRunner, Scheduler};
pub use storage::OutputNames;
