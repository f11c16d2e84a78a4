//! Saving and loading the shelf as a `Title,Author` CSV file.

use crate::csv;
use crate::goodreads::models::BookQuery;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

const BOM: &str = "\u{feff}";

/// Writes the shelf to `path`, oldest shelf entry first.
///
/// Goodreads lists the most recently added book first, so the order is
/// reversed. Returns the number of books written; an empty shelf writes
/// nothing.
pub fn save_books(books: &[BookQuery], path: &Path) -> Result<usize> {
    if books.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut out = String::from(BOM);
    out.push_str(&csv::format_row(&["Title", "Author"]));
    for book in books.iter().rev() {
        let title = if book.title.is_empty() { "Unknown title" } else { book.title.as_str() };
        let author = if book.author.is_empty() { "Unknown" } else { book.author.as_str() };
        out.push_str(&csv::format_row(&[title, author]));
    }

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write books file: {}", path.display()))?;

    debug!("Saved {} books to {}", books.len(), path.display());
    Ok(books.len())
}

/// Reads books from a CSV file with `Title` and `Author` columns.
///
/// Columns are found by header name; rows with an empty title are skipped.
pub fn load_books(path: &Path) -> Result<Vec<BookQuery>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read books file: {}", path.display()))?;

    let mut rows = csv::parse_rows(&text).into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| header.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let title_col = column("title")
        .with_context(|| format!("Missing Title column in {}", path.display()))?;
    let author_col = column("author");

    let mut books = Vec::new();
    for row in rows {
        let title = row.get(title_col).map(|t| t.trim()).unwrap_or_default();
        if title.is_empty() {
            warn!("Skipping row without a title: {:?}", row);
            continue;
        }
        let author = author_col.and_then(|c| row.get(c)).map(|a| a.trim()).unwrap_or_default();
        books.push(BookQuery::new(title, author));
    }

    debug!("Loaded {} books from {}", books.len(), path.display());
    Ok(books)
}
