//! shelf-hunter - find books from a Goodreads shelf on SkupSzop
//!
//! Downloads a reading shelf, searches the second-hand marketplace for each
//! book, and keeps the offers whose title, author and price match.

pub mod commands;
pub mod config;
pub mod csv;
pub mod error;
pub mod filters;
pub mod format;
pub mod goodreads;
pub mod http;
pub mod matching;
pub mod pipeline;
pub mod skupszop;

pub use config::Config;
pub use error::LookupError;
pub use goodreads::BookQuery;
pub use pipeline::{Pipeline, RunContext, RunSummary};
pub use skupszop::ResultRow;
