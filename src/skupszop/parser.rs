//! HTML parser for SkupSzop search results and listing pages.

use crate::skupszop::models::{CandidateListing, ListingDetail, PriceEntry};
use crate::skupszop::selectors::{listing, search};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// Parser for SkupSzop HTML pages.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses search result cards. Cards without a title link are skipped.
    pub fn parse_search(&self, html: &str) -> Vec<CandidateListing> {
        let document = Html::parse_document(html);

        let mut candidates = Vec::new();
        for card in document.select(&search::CARD) {
            match self.parse_card(card) {
                Some(candidate) => {
                    trace!("Parsed candidate: {} ({})", candidate.title, candidate.link);
                    candidates.push(candidate);
                }
                None => trace!("Skipping card without a title link"),
            }
        }

        debug!("Parsed {} candidates", candidates.len());
        candidates
    }

    fn parse_card(&self, card: ElementRef) -> Option<CandidateListing> {
        let anchor = card.select(&search::TITLE_LINK).next()?;
        let link = anchor.value().attr("href")?.to_string();
        let title = element_text(anchor);

        Some(CandidateListing { title, authors: texts(card, &search::AUTHOR), link })
    }

    /// Parses a listing page for `link`.
    ///
    /// When the page holds a product card linking to `link`, only that card
    /// is read. Otherwise the page itself is read, skipping every product
    /// card on it since those belong to other listings.
    pub fn parse_listing(&self, html: &str, link: &str) -> ListingDetail {
        let document = Html::parse_document(html);

        let own_card = document.select(&search::CARD).find(|card| {
            card.select(&search::TITLE_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .is_some_and(|href| href == link)
        });
        let scope = own_card.unwrap_or_else(|| document.root_element());
        let belongs = |element: &ElementRef| own_card.is_some() || !in_product_card(*element);

        let title = scope
            .select(&listing::TITLE)
            .find(|e| belongs(e))
            .map(element_text)
            .unwrap_or_default();
        let authors = scope
            .select(&listing::AUTHOR)
            .filter(|e| belongs(e))
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();

        let mut offers = Vec::new();
        for item in scope.select(&listing::OFFER).filter(|e| belongs(e)) {
            let price = item.select(&listing::OFFER_PRICE).next().map(element_text);
            let condition = item.select(&listing::OFFER_CONDITION).next().map(element_text);
            match (price, condition) {
                (Some(price), Some(condition)) => offers.push(PriceEntry { price, condition }),
                _ => trace!("Skipping offer without price or condition"),
            }
        }

        debug!("Parsed listing '{}' with {} offers", title, offers.len());
        ListingDetail { title, authors, offers }
    }
}

/// True when `element` sits inside a product card.
fn in_product_card(element: ElementRef) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(|a| search::CARD.matches(&a))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn texts(scope: ElementRef, selector: &Selector) -> Vec<String> {
    scope.select(selector).map(element_text).filter(|t| !t.is_empty()).collect()
}
