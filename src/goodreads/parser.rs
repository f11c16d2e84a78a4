//! HTML parser for Goodreads shelf list pages.

use crate::goodreads::models::{BookQuery, ShelfPage};
use crate::goodreads::selectors;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, trace};

/// Parser for shelf list pages.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses one shelf page into books and a next-page flag.
    pub fn parse_shelf(&self, html: &str) -> ShelfPage {
        let document = Html::parse_document(html);

        let mut page = ShelfPage::default();
        for row in document.select(&selectors::ROW) {
            match self.parse_row(row) {
                Some(book) => {
                    trace!("Parsed book: {} - {}", book.title, book.author);
                    page.books.push(book);
                }
                None => trace!("Skipping row without a title"),
            }
        }

        // A disabled "next" is a span, so an anchor is enough to go on
        page.has_next = document
            .select(&selectors::NEXT_PAGE)
            .next()
            .is_some_and(|a| !a.value().classes().any(|c| c == "disabled"));

        debug!("Parsed {} books (has_next: {})", page.books.len(), page.has_next);
        page
    }

    /// Extracts title and author from a single row. Rows without a title are dropped.
    pub fn parse_row(&self, row: ElementRef) -> Option<BookQuery> {
        let title = first_match(row, &selectors::TITLE)
            .map(|e| text_excluding(e, &selectors::SERIES))
            .filter(|t| !t.is_empty())?;

        let author = first_match(row, &selectors::AUTHOR)
            .map(|e| collapse_whitespace(&e.text().collect::<String>()))
            .unwrap_or_default();

        Some(BookQuery::new(title, author))
    }
}

/// First element found by the earliest selector in `candidates` that matches.
fn first_match<'a>(element: ElementRef<'a>, candidates: &[Selector]) -> Option<ElementRef<'a>> {
    candidates.iter().find_map(|selector| element.select(selector).next())
}

/// Text of `element` without anything inside descendants matching `skip`.
fn text_excluding(element: ElementRef, skip: &Selector) -> String {
    let mut text = String::new();
    collect_text(element, skip, &mut text);
    collapse_whitespace(&text)
}

fn collect_text(element: ElementRef, skip: &Selector, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !skip.matches(&child) {
                        collect_text(child, skip, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
