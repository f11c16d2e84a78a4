//! Shelf command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::goodreads::{
    fetch_shelf, is_shelf_url, normalize_shelf_url, save_books, BookQuery, GoodreadsClient,
    ShelfSource,
};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Downloads a shelf and saves it as the books CSV.
pub struct ShelfCommand {
    config: Config,
}

impl ShelfCommand {
    /// Creates a new shelf command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the shelf and returns formatted output.
    pub async fn execute(&self, url: &str) -> Result<String> {
        let client = GoodreadsClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, url).await
    }

    /// Fetches the shelf with a provided source (for testing).
    pub async fn execute_with_client<S>(&self, source: &S, url: &str) -> Result<String>
    where
        S: ShelfSource + ?Sized,
    {
        let books = self.fetch(source, url).await?;
        Ok(Formatter::new(self.config.format).format_books(&books))
    }

    /// Fetches and saves the shelf, returning the books in shelf order.
    pub async fn fetch<S>(&self, source: &S, url: &str) -> Result<Vec<BookQuery>>
    where
        S: ShelfSource + ?Sized,
    {
        let url = normalize_shelf_url(url);
        if !is_shelf_url(&url) {
            bail!("Not a Goodreads shelf URL: {} (expected goodreads.com/review/list/...)", url);
        }

        let books = fetch_shelf(source, &url, self.config.max_pages).await;
        let saved = save_books(&books, &self.config.books_csv)?;
        if saved > 0 {
            info!("Saved {} books to {}", saved, self.config.books_csv.display());
        }

        Ok(books)
    }
}
