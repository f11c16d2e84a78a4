//! Search command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::goodreads::{load_books, BookQuery};
use crate::pipeline::{CsvSink, Observer, Pipeline, RunContext, RunSummary};
use crate::skupszop::{ListingSearch, SkupszopClient};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Looks up every saved book on the listing site.
pub struct SearchCommand {
    config: Config,
    cancel: CancellationToken,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config, cancel: CancellationToken::new() }
    }

    /// Stops starting new lookups once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reads the books CSV, runs the lookups and returns formatted output.
    pub async fn execute(&self, observer: &dyn Observer) -> Result<String> {
        let books = load_books(&self.config.books_csv)?;
        info!("Loaded {} books from {}", books.len(), self.config.books_csv.display());

        self.execute_books(&books, observer).await
    }

    /// Runs the lookups for already loaded books.
    pub async fn execute_books(&self, books: &[BookQuery], observer: &dyn Observer) -> Result<String> {
        let client = SkupszopClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, books, observer).await
    }

    /// Runs the lookups with a provided client (for testing).
    pub async fn execute_with_client<C>(
        &self,
        client: &C,
        books: &[BookQuery],
        observer: &dyn Observer,
    ) -> Result<String>
    where
        C: ListingSearch + ?Sized,
    {
        let summary = self.run(client, books, observer).await?;
        Ok(Formatter::new(self.config.format).format_rows(&summary.rows))
    }

    /// Runs the pipeline into the results CSV and returns the summary.
    pub async fn run<C>(
        &self,
        client: &C,
        books: &[BookQuery],
        observer: &dyn Observer,
    ) -> Result<RunSummary>
    where
        C: ListingSearch + ?Sized,
    {
        self.config.validate()?;

        let sink = CsvSink::create(&self.config.results_csv)?;
        let ctx = RunContext::new(&sink, observer).with_cancel(self.cancel.clone());

        let summary = Pipeline::new(&self.config).run(client, books, &ctx).await?;
        if summary.cancelled {
            warn!(
                "Stopped early: {} of {} books processed",
                summary.queries_processed, summary.queries_total
            );
        }
        info!("Results saved to {}", sink.path().display());

        Ok(summary)
    }
}
