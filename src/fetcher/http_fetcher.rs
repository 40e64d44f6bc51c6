use async_trait::async_trait;
use tracing::{info, warn};
use wreq::Client;

use super::{FetchedPage, PageFetcher};
use crate::config::FetchConfig;
use crate::error::FetchError;

/// Single-request HTTP fetcher with fixed browser-like headers
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(HttpFetcher { client, config })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        info!("🌐 Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.as_str())
            .header("Accept-Language", self.config.accept_language.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error {} from {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        info!("Successfully fetched {} characters from {}", body.len(), final_url);
        Ok(FetchedPage { final_url, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_fixed_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("Accept-Language", "en-US,en;q=0.9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div class=\"product\"></div>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/products", server.uri());
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.body, "<div class=\"product\"></div>");
        assert_eq!(page.final_url, url);

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert!(agent.contains("Chrome/120.0"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }), "got {err:?}");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // nothing listens on port 1
        let err = fetcher().fetch("http://127.0.0.1:1/products").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = FetchConfig {
            timeout_seconds: 1,
            ..FetchConfig::default()
        };
        let err = HttpFetcher::new(config)
            .unwrap()
            .fetch(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "got {err:?}");
    }
}
