//! Goodreads shelf fetching, parsing and CSV export.

pub mod books;
pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use books::{load_books, save_books};
pub use client::{fetch_shelf, is_shelf_url, normalize_shelf_url, shelf_pages, GoodreadsClient, ShelfSource};
pub use models::{BookQuery, ShelfPage};
pub use parser::Parser;
