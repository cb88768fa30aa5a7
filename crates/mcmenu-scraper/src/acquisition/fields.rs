//! Name and description extraction from a product page.

use super::parse_selector;
use crate::config::Selectors;
use crate::error::ScrapeResult;
use scraper::{Html, Selector};

/// Returned when the name selector matches nothing.
pub const NO_NAME: &str = "No name available";

/// Returned when the description selector matches nothing.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Name and description of one product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
}

/// Selector-driven field parser. Never fails once constructed.
pub struct FieldParser {
    name: Selector,
    description: Selector,
}

impl FieldParser {
    pub fn new(selectors: &Selectors) -> ScrapeResult<Self> {
        Ok(Self {
            name: parse_selector(&selectors.name)?,
            description: parse_selector(&selectors.description)?,
        })
    }

    /// Parse raw HTML and extract both fields.
    pub fn parse_page(&self, html: &str) -> ProductFields {
        let document = Html::parse_document(html);
        ProductFields {
            name: self.parse_name(&document),
            description: self.parse_description(&document),
        }
    }

    pub fn parse_name(&self, document: &Html) -> String {
        first_text(document, &self.name).unwrap_or_else(|| NO_NAME.to_string())
    }

    pub fn parse_description(&self, document: &Html) -> String {
        first_text(document, &self.description).unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }
}

/// Trimmed text content of the first match.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
