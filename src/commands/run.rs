//! Run command: shelf download followed by the listing search.

use crate::commands::{SearchCommand, ShelfCommand};
use crate::config::Config;
use crate::format::Formatter;
use crate::goodreads::{GoodreadsClient, ShelfSource};
use crate::pipeline::Observer;
use crate::skupszop::{ListingSearch, SkupszopClient};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fetches a shelf and searches for every book on it.
pub struct RunCommand {
    config: Config,
    cancel: CancellationToken,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config) -> Self {
        Self { config, cancel: CancellationToken::new() }
    }

    /// Stops starting new lookups once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes both steps against the live sites.
    pub async fn execute(&self, url: &str, observer: &dyn Observer) -> Result<String> {
        let shelf = GoodreadsClient::new(&self.config).context("Failed to create HTTP client")?;
        let listings =
            SkupszopClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_clients(&shelf, &listings, url, observer).await
    }

    /// Executes both steps with provided clients (for testing).
    pub async fn execute_with_clients<S, C>(
        &self,
        shelf: &S,
        listings: &C,
        url: &str,
        observer: &dyn Observer,
    ) -> Result<String>
    where
        S: ShelfSource + ?Sized,
        C: ListingSearch + ?Sized,
    {
        let books = ShelfCommand::new(self.config.clone()).fetch(shelf, url).await?;
        if books.is_empty() {
            info!("Shelf is empty, nothing to search");
            return Ok(Formatter::new(self.config.format).format_rows(&[]));
        }

        let search = SearchCommand::new(self.config.clone()).with_cancel(self.cancel.clone());
        let summary = search.run(listings, &books, observer).await?;

        Ok(Formatter::new(self.config.format).format_rows(&summary.rows))
    }
}
