//! Data models for SkupSzop listings and matched results.

use serde::{Deserialize, Serialize};

/// A search result card, before any matching decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateListing {
    /// Title as displayed on the card
    pub title: String,
    /// Authors as displayed on the card, possibly none
    pub authors: Vec<String>,
    /// Link to the listing page, as found in the markup
    pub link: String,
}

/// One offered copy: a price as displayed and its condition grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Raw price text, e.g. "15,50 zł"
    pub price: String,
    /// Seller-assigned condition, e.g. "dobry"
    pub condition: String,
}

impl PriceEntry {
    pub fn new(price: impl Into<String>, condition: impl Into<String>) -> Self {
        Self { price: price.into(), condition: condition.into() }
    }
}

/// What the listing page says about a candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingDetail {
    /// Refined title; empty when the page did not show one
    pub title: String,
    pub authors: Vec<String>,
    pub offers: Vec<PriceEntry>,
}

/// A matched listing offered within budget. Final output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub title: String,
    pub authors: Vec<String>,
    /// Price exactly as displayed
    pub price: String,
    pub condition: String,
    pub link: String,
}

impl ResultRow {
    /// Authors joined for single-column output.
    pub fn authors_joined(&self) -> String {
        self.authors.join("; ")
    }

    /// Cells in `Title, Author, Price, Condition, Link` order.
    pub fn to_record(&self) -> [String; 5] {
        [
            self.title.clone(),
            self.authors_joined(),
            self.price.clone(),
            self.condition.clone(),
            self.link.clone(),
        ]
    }
}
