// Copyright 2026 McMenu Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scrape run configuration.
//!
//! Every field has a default matching the live menu site, so an empty
//! JSON object (or no config file at all) is a valid configuration.
//! Selectors are plain CSS selector strings.

use crate::error::{ScrapeError, ScrapeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Full menu page of the Ukrainian site.
pub const DEFAULT_LISTING_URL: &str = "https://www.mcdonalds.com/ua/uk-ua/eat/fullmenu.html";

/// Browser-identifying user agent sent with product page requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/000000000 Safari/537.36";

pub const DEFAULT_CONCURRENCY: usize = 15;
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 100;
pub const DEFAULT_RENDER_DELAY_MS: u64 = 200;

/// CSS selectors for every extraction point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Product anchors on the listing page.
    pub product_link: String,
    /// Product name on a product page.
    pub name: String,
    /// Product description on a product page.
    pub description: String,
    /// Accordion toggle that reveals the nutrition table.
    pub accordion_button: String,
    /// Summary heading items (calories, fats, ...).
    pub heading_item: String,
    /// Screen-reader text inside a heading item.
    pub heading_text: String,
    /// Detail table column, mobile layout.
    pub details_column: String,
    /// One label/value pair inside a details column.
    pub detail_item: String,
    pub detail_metric: String,
    pub detail_value: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            product_link: "a.cmp-category__item-link".into(),
            name: "span.cmp-product-details-main__heading-title".into(),
            description: "div.cmp-text".into(),
            accordion_button: "#accordion-29309a7a60-item-9ea8a10642-button".into(),
            heading_item: ".cmp-nutrition-summary__heading-primary-item".into(),
            heading_text: ".sr-only-pd".into(),
            details_column: ".cmp-nutrition-summary__details-column-view-mobile".into(),
            detail_item: ".label-item".into(),
            detail_metric: ".metric".into(),
            detail_value: ".value".into(),
        }
    }
}

/// Settings for one scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Listing page enumerating product links.
    pub listing_url: String,
    pub user_agent: String,
    /// Maximum number of product tasks in flight.
    pub concurrency: usize,
    /// Pause between successive task submissions.
    pub submit_delay_ms: u64,
    /// Pause after navigation and after the accordion click.
    pub render_delay_ms: u64,
    /// Abort the whole run on the first failed product.
    pub fail_fast: bool,
    /// Snapshot output path.
    pub output: PathBuf,
    /// Explicit Chromium executable; discovered when unset.
    pub chromium_path: Option<PathBuf>,
    pub selectors: Selectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            concurrency: DEFAULT_CONCURRENCY,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            render_delay_ms: DEFAULT_RENDER_DELAY_MS,
            fail_fast: false,
            output: PathBuf::from(mcmenu::DEFAULT_SNAPSHOT_FILE),
            chromium_path: None,
            selectors: Selectors::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> ScrapeResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| ScrapeError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> ScrapeResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the orchestrator cannot run with.
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.concurrency == 0 {
            return Err(ScrapeError::Config("concurrency must be at least 1".into()));
        }
        url::Url::parse(&self.listing_url).map_err(|source| ScrapeError::InvalidUrl {
            url: self.listing_url.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }
}
