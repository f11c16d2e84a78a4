//! Data models for shelf books.

use serde::{Deserialize, Serialize};

/// A book taken from the user's shelf, used as a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookQuery {
    /// Main title, without the series suffix
    pub title: String,
    /// Author as shown on the shelf; empty when unknown
    pub author: String,
}

impl BookQuery {
    /// Creates a new query.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { title: title.into(), author: author.into() }
    }
}

/// Books parsed from one shelf page.
#[derive(Debug, Clone, Default)]
pub struct ShelfPage {
    pub books: Vec<BookQuery>,
    /// Whether an enabled "next" link was present
    pub has_next: bool,
}
