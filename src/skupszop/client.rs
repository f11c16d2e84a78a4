//! HTTP client for SkupSzop searches and listing pages.

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use async_trait::async_trait;
use tracing::info;

/// Production site root.
pub const BASE_URL: &str = "https://skupszop.pl";

/// Trait for listing search/page fetching - enables mocking for tests.
#[async_trait]
pub trait ListingSearch: Send + Sync {
    /// Searches by title, limited to offers up to `max_price`. Returns the HTML.
    async fn search(&self, title: &str, max_price: f64) -> Result<String>;

    /// Fetches a listing page by the link found on a search result.
    async fn listing(&self, link: &str) -> Result<String>;
}

/// SkupSzop HTTP client.
pub struct SkupszopClient {
    http: HttpClient,
    base_url: Option<String>,
}

impl SkupszopClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> anyhow::Result<Self> {
        Ok(Self { http: HttpClient::new(config, "pl-PL,pl;q=0.9,en;q=0.8")?, base_url })
    }

    /// Returns the base URL (custom for testing, or the production site).
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(BASE_URL)
    }

    /// Resolves a link from the markup against the base URL.
    fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else if link.starts_with('/') {
            format!("{}{}", self.base_url(), link)
        } else {
            format!("{}/{}", self.base_url(), link)
        }
    }
}

#[async_trait]
impl ListingSearch for SkupszopClient {
    async fn search(&self, title: &str, max_price: f64) -> Result<String> {
        let url = format!(
            "{}/wyszukaj?keyword={}&price_to={}",
            self.base_url(),
            urlencoding::encode(title),
            max_price
        );

        info!("Searching: {}", title);
        self.http.get(&url).await
    }

    async fn listing(&self, link: &str) -> Result<String> {
        let url = self.resolve(link);

        info!("Fetching listing: {}", url);
        self.http.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, timeout_secs: 2, ..Config::default() }
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(urlencoding::encode("Pan Tadeusz"), "Pan%20Tadeusz");
        assert_eq!(urlencoding::encode("Łódź"), "%C5%81%C3%B3d%C5%BA");
    }

    #[test]
    fn test_resolve_links() {
        let client = SkupszopClient::new(&make_test_config()).unwrap();
        assert_eq!(client.resolve("/p/solaris"), "https://skupszop.pl/p/solaris");
        assert_eq!(client.resolve("p/solaris"), "https://skupszop.pl/p/solaris");
        assert_eq!(client.resolve("https://skupszop.pl/p/x"), "https://skupszop.pl/p/x");
    }

    #[tokio::test]
    async fn test_search_sends_keyword_and_price() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wyszukaj"))
            .and(query_param("keyword", "Pan Tadeusz"))
            .and(query_param("price_to", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>found</html>"))
            .mount(&mock_server)
            .await;

        let client =
            SkupszopClient::with_base_url(&make_test_config(), Some(mock_server.uri())).unwrap();

        let body = client.search("Pan Tadeusz", 20.0).await.unwrap();
        assert!(body.contains("found"));
    }

    #[tokio::test]
    async fn test_listing_resolves_relative_link() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/p/solaris-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>listing</html>"))
            .mount(&mock_server)
            .await;

        let client =
            SkupszopClient::with_base_url(&make_test_config(), Some(mock_server.uri())).unwrap();

        let body = client.listing("/p/solaris-123").await.unwrap();
        assert!(body.contains("listing"));
    }

    #[tokio::test]
    async fn test_listing_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client =
            SkupszopClient::with_base_url(&make_test_config(), Some(mock_server.uri())).unwrap();

        let err = client.listing("/p/gone").await.unwrap_err();
        assert!(matches!(err, LookupError::Status(404)));
    }

    #[tokio::test]
    async fn test_base_url_default() {
        let client = SkupszopClient::new(&make_test_config()).unwrap();
        assert_eq!(client.base_url(), "https://skupszop.pl");
    }
}
