//! HTTP-side acquisition: plain page fetches and selector-based parsing.
//!
//! Nothing here needs a browser. The listing page and the product pages'
//! name/description come from raw HTML parsed with the `scraper` crate.

pub mod fields;
pub mod http_client;
pub mod links;

use crate::error::{ScrapeError, ScrapeResult};
use scraper::Selector;

pub use fields::{FieldParser, ProductFields, NO_DESCRIPTION, NO_NAME};
pub use http_client::{HttpClient, HttpResponse};
pub use links::{extract_product_links, LinkCollector};

/// Compile a CSS selector, keeping the offending text in the error.
pub(crate) fn parse_selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}
