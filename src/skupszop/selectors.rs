//! CSS selectors for SkupSzop HTML parsing.
//!
//! Search result cards and listing pages share the product-card markup.
//! Update this file when SkupSzop changes their HTML structure.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search results pages.
pub mod search {
    use super::*;

    /// One search result.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.product-card").unwrap());

    /// Title anchor; its href is the listing link.
    pub static TITLE_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.product-card__title a").unwrap());

    /// Each displayed author.
    pub static AUTHOR: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.product-card__author .author").unwrap());
}

/// Selectors for a single listing page.
pub mod listing {
    use super::*;

    /// Refined title.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h1.product__title, \
             h1.product-title, \
             div.product-card__title a",
        )
        .unwrap()
    });

    /// Each displayed author.
    pub static AUTHOR: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".product__author .author, \
             div.product-card__author .author",
        )
        .unwrap()
    });

    /// One offered copy in the condition dropdown.
    pub static OFFER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".product-dropdown-condition-list li").unwrap());

    /// Price inside an offer.
    pub static OFFER_PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".dropdown-list-price span").unwrap());

    /// Condition inside an offer.
    pub static OFFER_CONDITION: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".dropdown-list-condition").unwrap());
}
