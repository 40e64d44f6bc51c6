pub mod http_fetcher;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http_fetcher::HttpFetcher;

/// Raw markup of one page plus the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub body: String,
}

/// Retrieves the markup behind a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
