//! Author match filter.

use super::Filter;
use crate::goodreads::BookQuery;
use crate::matching::author_matches;
use crate::skupszop::CandidateListing;
use tracing::debug;

/// Keeps listings where one displayed author is the query author.
///
/// Listings that show no author at all are kept.
pub struct AuthorFilter {
    threshold: f64,
}

impl AuthorFilter {
    /// Creates a filter with the given minimum similarity ratio.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Checks an author list directly, with the same empty-list rule.
    pub fn accepts<S: AsRef<str>>(&self, query_author: &str, authors: &[S]) -> bool {
        if authors.is_empty() {
            debug!("No author displayed, accepting without author check");
            return true;
        }
        author_matches(query_author, authors, self.threshold)
    }
}

impl Filter for AuthorFilter {
    fn matches(&self, query: &BookQuery, listing: &CandidateListing) -> bool {
        self.accepts(&query.author, &listing.authors)
    }

    fn description(&self) -> String {
        format!("Author similarity >= {:.2}", self.threshold)
    }
}
