//! Goodreads shelf client and page traversal.

use crate::config::Config;
use crate::error::Result;
use crate::goodreads::models::BookQuery;
use crate::goodreads::parser::Parser;
use crate::http::HttpClient;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

/// Trait for shelf page fetching - enables mocking for tests.
#[async_trait]
pub trait ShelfSource: Send + Sync {
    /// Fetches one page (1-based) of the shelf at `url`.
    async fn page(&self, url: &str, page: u32) -> Result<String>;
}

/// Goodreads HTTP client.
pub struct GoodreadsClient {
    http: HttpClient,
}

impl GoodreadsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self { http: HttpClient::new(config, "en-US,en;q=0.9")? })
    }
}

#[async_trait]
impl ShelfSource for GoodreadsClient {
    async fn page(&self, url: &str, page: u32) -> Result<String> {
        let page_url = page_url(url, page);
        info!("Fetching shelf page {}", page);
        self.http.get(&page_url).await
    }
}

/// URL of the given shelf page. Page 1 is the shelf URL itself.
pub fn page_url(url: &str, page: u32) -> String {
    if page <= 1 {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", url, separator, page)
}

/// Lazily walks the shelf, yielding the books of each page in order.
///
/// Stops at the first page with no books, when there is no enabled "next"
/// link, after `max_pages`, or on the first request error (logged).
pub fn shelf_pages<'a, S>(
    source: &'a S,
    url: &'a str,
    max_pages: u32,
) -> impl Stream<Item = Vec<BookQuery>> + 'a
where
    S: ShelfSource + ?Sized,
{
    stream::unfold(Some(1u32), move |state| async move {
        let page = state?;
        if page > max_pages {
            debug!("Reached page limit ({})", max_pages);
            return None;
        }

        let html = match source.page(url, page).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Error fetching shelf page {}: {}", page, e);
                return None;
            }
        };

        let parsed = Parser::new().parse_shelf(&html);
        if parsed.books.is_empty() {
            debug!("No books found on page {}", page);
            return None;
        }

        let next = parsed.has_next.then_some(page + 1);
        Some((parsed.books, next))
    })
}

/// Collects the whole shelf.
pub async fn fetch_shelf<S>(source: &S, url: &str, max_pages: u32) -> Vec<BookQuery>
where
    S: ShelfSource + ?Sized,
{
    let books: Vec<BookQuery> =
        shelf_pages(source, url, max_pages).flat_map(stream::iter).collect().await;
    info!("Found {} books on shelf", books.len());
    books
}

/// Adds `https://` when no scheme was given and upgrades plain `http://`.
pub fn normalize_shelf_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", url)
    }
}

/// True for Goodreads shelf list URLs (`goodreads.com/review/list/...`).
pub fn is_shelf_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")) else {
        return false;
    };

    let (host, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    host.contains("goodreads.com") && path.starts_with("/review/list/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mock shelf serving canned pages.
    struct MockShelf {
        pages: Vec<String>,
        fail_on: Option<u32>,
        calls: AtomicU32,
    }

    impl MockShelf {
        fn new(pages: Vec<String>) -> Self {
            Self { pages, fail_on: None, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl ShelfSource for MockShelf {
        async fn page(&self, _url: &str, page: u32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(page) {
                return Err(LookupError::Timeout("page".to_string()));
            }
            Ok(self.pages.get(page as usize - 1).cloned().unwrap_or_default())
        }
    }

    fn shelf_html(books: &[(&str, &str)], has_next: bool) -> String {
        let mut html = String::from("<html><body><table><tbody>");
        for (i, (title, author)) in books.iter().enumerate() {
            html.push_str(&format!(
                r#"<tr id="review_{}"><td class="field title"><a>{}</a></td><td class="field author"><a>{}</a></td></tr>"#,
                i, title, author
            ));
        }
        html.push_str("</tbody></table>");
        if has_next {
            html.push_str(r##"<a class="next_page" href="#">next</a>"##);
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn test_page_url() {
        let url = "https://www.goodreads.com/review/list/1-ola?shelf=to-read";
        assert_eq!(page_url(url, 1), url);
        assert_eq!(page_url(url, 3), format!("{}&page=3", url));
        assert_eq!(
            page_url("https://www.goodreads.com/review/list/1", 2),
            "https://www.goodreads.com/review/list/1?page=2"
        );
    }

    #[test]
    fn test_normalize_shelf_url() {
        assert_eq!(
            normalize_shelf_url("www.goodreads.com/review/list/1"),
            "https://www.goodreads.com/review/list/1"
        );
        assert_eq!(
            normalize_shelf_url("http://goodreads.com/review/list/1"),
            "https://goodreads.com/review/list/1"
        );
        assert_eq!(
            normalize_shelf_url(" https://goodreads.com/review/list/1 "),
            "https://goodreads.com/review/list/1"
        );
    }

    #[test]
    fn test_is_shelf_url() {
        assert!(is_shelf_url("https://www.goodreads.com/review/list/149269739-ola?shelf=test"));
        assert!(!is_shelf_url("https://www.goodreads.com/book/show/5907.The_Hobbit"));
        assert!(!is_shelf_url("https://example.com/review/list/1"));
        assert!(!is_shelf_url("goodreads.com/review/list/1"));
        assert!(!is_shelf_url("https://www.goodreads.com"));
    }

    #[tokio::test]
    async fn test_fetch_shelf_follows_pages() {
        let source = MockShelf::new(vec![
            shelf_html(&[("Solaris", "Stanisław Lem"), ("Diuna", "Frank Herbert")], true),
            shelf_html(&[("The Hobbit", "J.R.R. Tolkien")], false),
        ]);

        let books = fetch_shelf(&source, "https://www.goodreads.com/review/list/1", 100).await;
        assert_eq!(
            books,
            vec![
                BookQuery::new("Solaris", "Stanisław Lem"),
                BookQuery::new("Diuna", "Frank Herbert"),
                BookQuery::new("The Hobbit", "J.R.R. Tolkien"),
            ]
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_shelf_stops_on_empty_page() {
        let source = MockShelf::new(vec![
            shelf_html(&[("Solaris", "Stanisław Lem")], true),
            shelf_html(&[], true),
            shelf_html(&[("Never", "Reached")], false),
        ]);

        let books = fetch_shelf(&source, "u", 100).await;
        assert_eq!(books.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_shelf_respects_max_pages() {
        let page = shelf_html(&[("Solaris", "Stanisław Lem")], true);
        let source = MockShelf::new(vec![page.clone(), page.clone(), page]);

        let books = fetch_shelf(&source, "u", 2).await;
        assert_eq!(books.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_shelf_stops_on_error() {
        let page = shelf_html(&[("Solaris", "Stanisław Lem")], true);
        let mut source = MockShelf::new(vec![page.clone(), page]);
        source.fail_on = Some(2);

        let books = fetch_shelf(&source, "u", 100).await;
        assert_eq!(books, vec![BookQuery::new("Solaris", "Stanisław Lem")]);
    }

    #[tokio::test]
    async fn test_shelf_pages_is_lazy() {
        let page = shelf_html(&[("Solaris", "Stanisław Lem")], true);
        let source = MockShelf::new(vec![page.clone(), page.clone(), page]);

        let first: Vec<Vec<BookQuery>> = shelf_pages(&source, "u", 100).take(1).collect().await;
        assert_eq!(first.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_goodreads_client_requests_pages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/review/list/1"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(shelf_html(&[("Page Two", "Someone")], false)),
            )
            .mount(&mock_server)
            .await;

        let config = Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() };
        let client = GoodreadsClient::new(&config).unwrap();
        let url = format!("{}/review/list/1?shelf=read", mock_server.uri());

        let body = client.page(&url, 2).await.unwrap();
        assert!(body.contains("Page Two"));
    }
}
