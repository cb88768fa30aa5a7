//! Product link collection from the listing page.

use super::http_client::HttpClient;
use super::parse_selector;
use crate::error::{ScrapeError, ScrapeResult};
use scraper::{Html, Selector};
use url::Url;

/// Fetches the listing page and returns absolute product URLs.
pub struct LinkCollector {
    client: HttpClient,
    selector: Selector,
}

impl LinkCollector {
    pub fn new(client: HttpClient, link_selector: &str) -> ScrapeResult<Self> {
        Ok(Self {
            client,
            selector: parse_selector(link_selector)?,
        })
    }

    /// One GET of `listing_url`.
    ///
    /// A non-success status is logged and yields no links. Transport
    /// failures are still returned as errors.
    pub async fn collect(&self, listing_url: &str) -> ScrapeResult<Vec<String>> {
        let base = Url::parse(listing_url).map_err(|source| ScrapeError::InvalidUrl {
            url: listing_url.to_string(),
            source,
        })?;

        let resp = self.client.get(listing_url).await?;
        if !resp.is_success() {
            tracing::info!(
                url = listing_url,
                status = resp.status,
                "Failed to retrieve page. Status code: {}",
                resp.status
            );
            return Ok(Vec::new());
        }

        let links = extract_product_links(&resp.body, &base, &self.selector);
        tracing::info!(url = listing_url, count = links.len(), "collected product links");
        Ok(links)
    }
}

/// Resolve the `href` of every anchor matching `selector` against `base`.
///
/// One URL per matching anchor, in document order, duplicates kept. An
/// anchor without `href` resolves to `base` itself.
pub fn extract_product_links(html: &str, base: &Url, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|el| match el.value().attr("href") {
            Some(href) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => base.to_string(),
        })
        .collect()
}
