//! Listing filtering system with composable filters.

pub mod author;
pub mod price;
pub mod title;

use crate::goodreads::BookQuery;
use crate::skupszop::CandidateListing;

pub use author::AuthorFilter;
pub use price::{parse_price, PriceFilter};
pub use title::TitleFilter;

/// Trait for deciding whether a listing is the queried book.
pub trait Filter: Send + Sync {
    /// Returns true if the listing passes the filter for this query.
    fn matches(&self, query: &BookQuery, listing: &CandidateListing) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass, checked in insertion order.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a listing passes all filters.
    pub fn matches(&self, query: &BookQuery, listing: &CandidateListing) -> bool {
        self.filters.iter().all(|f| f.matches(query, listing))
    }

    /// Keeps the listings that pass, in their original order.
    pub fn apply(&self, query: &BookQuery, listings: Vec<CandidateListing>) -> Vec<CandidateListing> {
        listings.into_iter().filter(|l| self.matches(query, l)).collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from configuration.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Adds a title similarity filter.
    pub fn title_similarity(mut self, threshold: f64) -> Self {
        self.chain.add(TitleFilter::new(threshold));
        self
    }

    /// Adds an author match filter.
    pub fn author_match(mut self, threshold: f64) -> Self {
        self.chain.add(AuthorFilter::new(threshold));
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
