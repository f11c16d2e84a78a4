//! Title similarity filter.

use super::Filter;
use crate::goodreads::BookQuery;
use crate::matching::title_similar;
use crate::skupszop::CandidateListing;

/// Keeps listings whose title is close to the query title, ignoring case.
pub struct TitleFilter {
    threshold: f64,
}

impl TitleFilter {
    /// Creates a filter with the given minimum similarity ratio.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Filter for TitleFilter {
    fn matches(&self, query: &BookQuery, listing: &CandidateListing) -> bool {
        title_similar(&listing.title, &query.title, self.threshold)
    }

    fn description(&self) -> String {
        format!("Title similarity >= {:.2}", self.threshold)
    }
}
