use thiserror::Error;

/// Network or HTTP failure while retrieving a page
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// I/O or serialization failure while writing output files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no products to save")]
    NoRecords,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] polars::prelude::PolarsError),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Terminal failure of one scrape-and-save run
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no products found")]
    NoProducts,

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Failure caught at the scheduler's per-job boundary
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job '{job}' failed: {message}")]
    Failed { job: String, message: String },

    #[error("job '{job}' panicked: {message}")]
    Panicked { job: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to load config: {0}")]
    Layered(#[from] config::ConfigError),

    #[error("job '{job}' has invalid time '{time}' (expected HH:MM)")]
    InvalidJobTime { job: String, time: String },

    #[error("invalid selector table: {0}")]
    Selectors(String),

    #[error("invalid delay range {min}..{max}")]
    DelayRange { min: f64, max: f64 },
}
