//! Error types for site lookups.
//!
//! Lookups never abort a run: the pipeline logs these and skips the query
//! or listing. The variants keep network trouble apart from an honest
//! "nothing found" so the two are logged differently.

use thiserror::Error;

/// Failure of a single page lookup on the shelf or listing site.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The request did not complete within its bounded wait.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection, TLS, proxy or body read failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status: {0}")]
    Status(u16),

    /// The server is throttling us (429/503).
    #[error("Rate limited (status {0}). Try increasing --delay or using a proxy.")]
    RateLimited(u16),

    /// The page loaded but held nothing to match against.
    #[error("No results for: {0}")]
    NoResults(String),
}

impl LookupError {
    /// True for failures that point at connectivity rather than content.
    pub fn is_transport(&self) -> bool {
        !matches!(self, LookupError::NoResults(_))
    }
}

impl From<wreq::Error> for LookupError {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Result type alias for site lookups.
pub type Result<T> = std::result::Result<T, LookupError>;
