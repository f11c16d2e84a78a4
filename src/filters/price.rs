//! Price range filter for offered copies.

use crate::skupszop::PriceEntry;
use tracing::trace;

/// Parses a displayed price such as `"15,50 zł"` into a number.
///
/// Everything but digits, signs and separators is dropped. When a decimal
/// comma is present, periods are thousands separators. Returns `None`
/// when nothing numeric is left. All locale handling lives here.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    // "zł." leaves a dangling period
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }

    // With a decimal comma any period groups thousands
    let number =
        if cleaned.contains(',') { cleaned.replace('.', "").replace(',', ".") } else { cleaned.to_string() };

    number.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Keeps offers whose price parses and lies within `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct PriceFilter {
    min: f64,
    max: f64,
}

impl PriceFilter {
    /// Creates a filter with both bounds inclusive.
    pub fn range(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if the offer's price parses and is within range.
    pub fn accepts(&self, entry: &PriceEntry) -> bool {
        match parse_price(&entry.price) {
            Some(price) => price >= self.min && price <= self.max,
            None => {
                trace!("Discarding unparseable price: {:?}", entry.price);
                false
            }
        }
    }

    /// Filters offers, keeping their order.
    pub fn apply<'a>(&self, entries: &'a [PriceEntry]) -> impl Iterator<Item = &'a PriceEntry> + 'a {
        let filter = *self;
        entries.iter().filter(move |e| filter.accepts(e))
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn description(&self) -> String {
        format!("Price: {:.2} - {:.2}", self.min, self.max)
    }
}
