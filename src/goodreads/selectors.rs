//! CSS selectors for Goodreads shelf pages.
//!
//! Title and author use ordered fallbacks: the first selector that finds
//! anything in a row wins. Update these lists when the shelf markup changes.

use scraper::Selector;
use std::sync::LazyLock;

/// One book row on a shelf list page.
pub static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr[id^="review_"]"#).unwrap());

/// Title link candidates, tried in order.
pub static TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_all(&[
        "td.field.title a",
        "td.title a",
        ".title a",
        r#"a[href*="/book/show/"]"#,
        ".bookTitle",
    ])
});

/// Series suffix inside a title, e.g. "(Middle-earth #0)".
pub static SERIES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.darkGreyText").unwrap());

/// Author link candidates, tried in order.
pub static AUTHOR: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_all(&[
        "td.field.author a",
        "td.author a",
        ".author a",
        r#"a[href*="/author/show/"]"#,
        ".authorName",
    ])
});

/// Pagination "next" link. Rendered as a span with `disabled` on the last page.
pub static NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.next_page").unwrap());

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors.iter().map(|s| Selector::parse(s).unwrap()).collect()
}
