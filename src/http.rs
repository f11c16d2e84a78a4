//! Shared HTTP client using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::{LookupError, Result};
use anyhow::Context;
use rand::RngExt;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Browser-impersonating HTTP client with a single bounded wait per request
/// and human-like spacing between requests.
pub struct HttpClient {
    client: Client,
    accept_language: &'static str,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config, accept_language: &'static str) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            accept_language,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Performs a GET request and returns the body. No retries.
    pub async fn get(&self, url: &str) -> Result<String> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", self.accept_language)
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("DNT", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.as_u16() == 429 || status.as_u16() == 503 {
            warn!("Rate limited ({}). Consider using a proxy or increasing delay.", status);
            return Err(LookupError::RateLimited(status.as_u16()));
        }

        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 && self.delay_jitter_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, timeout_secs: 1, ..Config::default() }
    }

    #[tokio::test]
    async fn test_get_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&make_test_config(), "en-US,en;q=0.9").unwrap();
        let body = client.get(&format!("{}/page", mock_server.uri())).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&make_test_config(), "en-US,en;q=0.9").unwrap();
        let err = client.get(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(err, LookupError::RateLimited(429)));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&make_test_config(), "en-US,en;q=0.9").unwrap();
        let err = client.get(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(err, LookupError::Status(404)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_secs(3)).set_body_string("late"),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(&make_test_config(), "en-US,en;q=0.9").unwrap();
        let err = client.get(&mock_server.uri()).await.unwrap_err();
        assert!(err.is_transport());
    }
}
