//! Matching pipeline: shelf books in, priced listings out.
//!
//! Each query runs search, candidate filtering, listing lookups and price
//! filtering in that order. Up to `concurrency` queries are in flight at a
//! time; listing lookups inside one query stay sequential. A failed lookup
//! only skips its query or listing. Failing to write a result ends the run.

pub mod events;
pub mod sink;

use crate::config::Config;
use crate::error::LookupError;
use crate::filters::{AuthorFilter, FilterChain, FilterChainBuilder, PriceFilter};
use crate::goodreads::BookQuery;
use crate::skupszop::{CandidateListing, ListingSearch, Parser, ResultRow};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use events::{ChannelObserver, NoopObserver, Observer, PipelineEvent, ProgressEvent};
pub use sink::{CsvSink, ResultSink};

/// Where a run sends its output, and how it is stopped.
pub struct RunContext<'a> {
    pub sink: &'a dyn ResultSink,
    pub observer: &'a dyn Observer,
    pub cancel: CancellationToken,
}

impl<'a> RunContext<'a> {
    pub fn new(sink: &'a dyn ResultSink, observer: &'a dyn Observer) -> Self {
        Self { sink, observer, cancel: CancellationToken::new() }
    }

    /// Uses an externally owned token, e.g. one tied to Ctrl-C.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// What a finished (or cancelled) run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub queries_total: usize,
    /// Queries that ran to the end, whether or not they produced rows
    pub queries_processed: usize,
    /// Queries dropped because the search failed or found nothing
    pub queries_skipped: usize,
    /// Listings that passed title and author checks
    pub listings_matched: usize,
    /// Rows grouped by query, in the order queries finished. With several
    /// queries in flight the results file may interleave them differently.
    pub rows: Vec<ResultRow>,
    pub cancelled: bool,
    pub elapsed: Duration,
}

enum QueryOutcome {
    Done { matched: usize, rows: Vec<ResultRow> },
    Skipped,
    Cancelled,
}

/// Configured matcher, reusable across runs.
pub struct Pipeline {
    filters: FilterChain,
    authors: AuthorFilter,
    prices: PriceFilter,
    concurrency: usize,
}

impl Pipeline {
    /// Builds the filters from the configured thresholds and price range.
    pub fn new(config: &Config) -> Self {
        Self {
            filters: FilterChainBuilder::new()
                .title_similarity(config.title_threshold)
                .author_match(config.author_threshold)
                .build(),
            authors: AuthorFilter::new(config.author_threshold),
            prices: PriceFilter::range(config.min_price, config.max_price),
            concurrency: config.concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every query against the listing site.
    ///
    /// Queries are started in input order. Once `ctx.cancel` fires no new
    /// query starts, but those already running finish. The only error
    /// returned is a sink failure.
    pub async fn run<C>(
        &self,
        client: &C,
        queries: &[BookQuery],
        ctx: &RunContext<'_>,
    ) -> Result<RunSummary>
    where
        C: ListingSearch + ?Sized,
    {
        let start = Instant::now();
        let total = queries.len();

        info!("Matching {} books with concurrency {}", total, self.concurrency);
        for description in self.filters.descriptions() {
            debug!("Filter: {}", description);
        }
        debug!("Filter: {}", self.prices.description());

        let mut summary = RunSummary { queries_total: total, ..RunSummary::default() };

        let mut outcomes = stream::iter(queries.iter().enumerate())
            .map(|(i, query)| self.process_query(client, i + 1, total, query, ctx))
            .buffer_unordered(self.concurrency);

        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                QueryOutcome::Done { matched, rows } => {
                    summary.queries_processed += 1;
                    summary.listings_matched += matched;
                    summary.rows.extend(rows);
                }
                QueryOutcome::Skipped => {
                    summary.queries_processed += 1;
                    summary.queries_skipped += 1;
                }
                QueryOutcome::Cancelled => summary.cancelled = true,
            }
        }

        summary.elapsed = start.elapsed();
        info!(
            "Processed {}/{} books, {} rows written in {:.1}s{}",
            summary.queries_processed,
            total,
            summary.rows.len(),
            summary.elapsed.as_secs_f64(),
            if summary.cancelled { " (cancelled)" } else { "" }
        );

        Ok(summary)
    }

    async fn process_query<C>(
        &self,
        client: &C,
        index: usize,
        total: usize,
        query: &BookQuery,
        ctx: &RunContext<'_>,
    ) -> Result<QueryOutcome>
    where
        C: ListingSearch + ?Sized,
    {
        if ctx.cancel.is_cancelled() {
            debug!("Cancelled before starting: {}", query.title);
            return Ok(QueryOutcome::Cancelled);
        }

        info!("[{}/{}] {} - {}", index, total, query.title, query.author);
        let progress = ProgressEvent {
            index,
            total,
            title: query.title.clone(),
            author: query.author.clone(),
        };
        if let Err(e) = ctx.observer.on_progress(&progress) {
            debug!("Progress observer failed: {:#}", e);
        }

        let parser = Parser::new();
        let candidates = match client.search(&query.title, self.prices.max()).await {
            Ok(html) => parser.parse_search(&html),
            Err(e) => {
                log_skip(&query.title, &e);
                return Ok(QueryOutcome::Skipped);
            }
        };

        if candidates.is_empty() {
            log_skip(&query.title, &LookupError::NoResults(query.title.clone()));
            return Ok(QueryOutcome::Skipped);
        }

        let found = candidates.len();
        let matching = self.filters.apply(query, candidates);
        debug!("{}: {} of {} candidates match", query.title, matching.len(), found);

        let mut rows = Vec::new();
        for listing in &matching {
            let html = match client.listing(&listing.link).await {
                Ok(html) => html,
                Err(e) => {
                    log_skip(&listing.link, &e);
                    continue;
                }
            };

            for row in self.priced_rows(query, listing, &parser, &html) {
                ctx.sink.append(&row)?;
                if let Err(e) = ctx.observer.on_result(&row) {
                    debug!("Result observer failed: {:#}", e);
                }
                rows.push(row);
            }
        }

        Ok(QueryOutcome::Done { matched: matching.len(), rows })
    }

    /// Rows for the in-range offers on a listing page, or none when the page
    /// names a different author.
    fn priced_rows(
        &self,
        query: &BookQuery,
        listing: &CandidateListing,
        parser: &Parser,
        html: &str,
    ) -> Vec<ResultRow> {
        let detail = parser.parse_listing(html, &listing.link);

        let authors = if detail.authors.is_empty() { listing.authors.clone() } else { detail.authors };
        if !self.authors.accepts(&query.author, &authors) {
            debug!("Listing {} names another author: {:?}", listing.link, authors);
            return Vec::new();
        }

        let title = if detail.title.is_empty() { listing.title.clone() } else { detail.title };

        self.prices
            .apply(&detail.offers)
            .map(|offer| ResultRow {
                title: title.clone(),
                authors: authors.clone(),
                price: offer.price.clone(),
                condition: offer.condition.clone(),
                link: listing.link.clone(),
            })
            .collect()
    }
}

fn log_skip(what: &str, err: &LookupError) {
    if err.is_transport() {
        warn!("Skipping {}: {}", what, err);
    } else {
        info!("Skipping {}: {}", what, err);
    }
}
