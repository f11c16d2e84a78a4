//! SkupSzop-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{ListingSearch, SkupszopClient};
pub use models::{CandidateListing, ListingDetail, PriceEntry, ResultRow};
pub use parser::Parser;
