//! End-to-end matching runs against fixture pages.

use async_trait::async_trait;
use shelf_hunter::config::Config;
use shelf_hunter::error::{LookupError, Result as LookupResult};
use shelf_hunter::goodreads::BookQuery;
use shelf_hunter::pipeline::{CsvSink, NoopObserver, Pipeline, RunContext};
use shelf_hunter::skupszop::{ListingSearch, ResultRow, SkupszopClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_FIXTURE: &str = include_str!("fixtures/search_results.html");
const LISTING_FIXTURE: &str = include_str!("fixtures/listing.html");
const HOBBIT_LINK: &str = "/p/hobbit-czyli-tam-i-z-powrotem-1001";

/// Serves the fixtures for "Hobbit"; every other title fails to connect.
#[derive(Default)]
struct FixtureSite {
    searches: AtomicUsize,
}

#[async_trait]
impl ListingSearch for FixtureSite {
    async fn search(&self, title: &str, _max_price: f64) -> LookupResult<String> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        match title {
            "Hobbit" => Ok(SEARCH_FIXTURE.to_string()),
            "Pusto" => Ok("<html><body></body></html>".to_string()),
            other => Err(LookupError::Timeout(format!("search for {}", other))),
        }
    }

    async fn listing(&self, link: &str) -> LookupResult<String> {
        if link == HOBBIT_LINK {
            Ok(LISTING_FIXTURE.to_string())
        } else {
            Err(LookupError::Status(404))
        }
    }
}

fn hobbit_config(concurrency: usize) -> Config {
    Config {
        delay_ms: 0,
        delay_jitter_ms: 0,
        timeout_secs: 5,
        min_price: 0.0,
        max_price: 20.0,
        // "hobbit" vs "the hobbit" scores exactly 0.75
        title_threshold: 0.75,
        concurrency,
        ..Config::default()
    }
}

fn hobbit_query() -> BookQuery {
    BookQuery::new("Hobbit", "J.R.R. Tolkien")
}

fn expected_row() -> ResultRow {
    ResultRow {
        title: "The Hobbit".to_string(),
        authors: vec!["J. R. R. Tolkien".to_string()],
        price: "15,50".to_string(),
        condition: "good".to_string(),
        link: HOBBIT_LINK.to_string(),
    }
}

#[tokio::test]
async fn test_hobbit_scenario_emits_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.csv");
    let sink = CsvSink::create(&results).unwrap();
    let ctx = RunContext::new(&sink, &NoopObserver);

    let summary = Pipeline::new(&hobbit_config(1))
        .run(&FixtureSite::default(), &[hobbit_query()], &ctx)
        .await
        .unwrap();

    assert_eq!(summary.rows, vec![expected_row()]);
    assert_eq!(summary.listings_matched, 1);

    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(
        content,
        "Title,Author,Price,Condition,Link\n\
         The Hobbit,J. R. R. Tolkien,\"15,50\",good,/p/hobbit-czyli-tam-i-z-powrotem-1001\n"
    );
}

#[tokio::test]
async fn test_default_title_threshold_rejects_hobbit() {
    let config = Config { title_threshold: 0.8, ..hobbit_config(1) };
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::create(dir.path().join("results.csv")).unwrap();
    let ctx = RunContext::new(&sink, &NoopObserver);

    let summary = Pipeline::new(&config)
        .run(&FixtureSite::default(), &[hobbit_query()], &ctx)
        .await
        .unwrap();
    assert!(summary.rows.is_empty());
}

#[tokio::test]
async fn test_sequential_runs_are_identical() {
    let queries = vec![hobbit_query(), BookQuery::new("Pusto", "Nikt"), hobbit_query()];
    let dir = tempfile::tempdir().unwrap();

    let mut outputs = Vec::new();
    for name in ["first.csv", "second.csv"] {
        let path = dir.path().join(name);
        let sink = CsvSink::create(&path).unwrap();
        let ctx = RunContext::new(&sink, &NoopObserver);

        let summary = Pipeline::new(&hobbit_config(1))
            .run(&FixtureSite::default(), &queries, &ctx)
            .await
            .unwrap();
        outputs.push((summary.rows, std::fs::read_to_string(&path).unwrap()));
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0].0.len(), 2);
}

#[tokio::test]
async fn test_empty_query_list_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let sink = CsvSink::create(&path).unwrap();
    let ctx = RunContext::new(&sink, &NoopObserver);

    let summary =
        Pipeline::new(&hobbit_config(10)).run(&FixtureSite::default(), &[], &ctx).await.unwrap();

    assert!(summary.rows.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Title,Author,Price,Condition,Link\n");
}

#[tokio::test]
async fn test_failing_queries_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::create(dir.path().join("results.csv")).unwrap();
    let ctx = RunContext::new(&sink, &NoopObserver);

    let queries = vec![
        BookQuery::new("Timeout", "Ktoś"),
        hobbit_query(),
        BookQuery::new("Pusto", "Nikt"),
        BookQuery::new("Timeout 2", "Ktoś"),
    ];
    let site = FixtureSite::default();
    let summary = Pipeline::new(&hobbit_config(4)).run(&site, &queries, &ctx).await.unwrap();

    assert_eq!(summary.queries_processed, 4);
    assert_eq!(summary.queries_skipped, 3);
    assert_eq!(summary.rows, vec![expected_row()]);
    assert_eq!(site.searches.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_cancelled_run_starts_no_queries() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::create(dir.path().join("results.csv")).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ctx = RunContext::new(&sink, &NoopObserver).with_cancel(cancel);

    let site = FixtureSite::default();
    let summary =
        Pipeline::new(&hobbit_config(2)).run(&site, &[hobbit_query(), hobbit_query()], &ctx).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.queries_processed, 0);
    assert_eq!(site.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_http_client_against_mock_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wyszukaj"))
        .and(query_param("keyword", "Hobbit"))
        .and(query_param("price_to", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_FIXTURE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(HOBBIT_LINK))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_FIXTURE))
        .mount(&mock_server)
        .await;

    let config = hobbit_config(1);
    let client = SkupszopClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::create(dir.path().join("results.csv")).unwrap();
    let ctx = RunContext::new(&sink, &NoopObserver);

    let summary = Pipeline::new(&config).run(&client, &[hobbit_query()], &ctx).await.unwrap();
    assert_eq!(summary.rows, vec![expected_row()]);
}
