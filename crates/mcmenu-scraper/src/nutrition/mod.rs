//! Nutrition facts from a rendered product page.
//!
//! The nutrition table is built client-side and hidden behind an accordion,
//! so it needs a real browser. Each call launches its own Chromium, opens
//! the product page, clicks the accordion and pulls two groups of strings
//! out of the DOM with one script:
//!
//! 1. summary headings: screen-reader text shaped like `"550 Калорійність ккал"`
//! 2. detail table: `(metric, value)` pairs from the mobile column
//!
//! Tokenizing and translating those strings is plain Rust in
//! [`RawNutrition::into_facts`]. Detail entries overwrite heading entries
//! that translate to the same key.

pub mod translate;

use crate::config::Selectors;
use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::{BrowserLauncher, RenderContext, Renderer};
use mcmenu::ProductRecord;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

pub use translate::{translate_nutrient, NUTRIENT_TRANSLATIONS};

/// Nutrient key → value, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionFacts {
    entries: Map<String, Value>,
}

impl NutritionFacts {
    /// Set `key`. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Value::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }

    /// Copy every entry into `record`, after its existing fields.
    pub fn merge_into(&self, record: &mut ProductRecord) {
        for (key, value) in self.iter() {
            record.insert(key, value);
        }
    }
}

/// Strings gathered from the rendered DOM, before any parsing.
///
/// `None` marks a node the script expected but did not find.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNutrition {
    #[serde(default)]
    pub headings: Vec<Option<String>>,
    #[serde(default)]
    pub details: Vec<Vec<(Option<String>, Option<String>)>>,
}

impl RawNutrition {
    /// Tokenize, translate and merge both passes.
    pub fn into_facts(self, selectors: &Selectors) -> ScrapeResult<NutritionFacts> {
        let mut facts = NutritionFacts::default();

        for heading in self.headings {
            let text = heading.ok_or_else(|| missing(&selectors.heading_text))?;
            let (label, value) = parse_heading(&text)?;
            facts.insert(translate_nutrient(label), value);
        }

        for column in self.details {
            for (metric, value) in column {
                let metric = metric.ok_or_else(|| missing(&selectors.detail_metric))?;
                let value = value.ok_or_else(|| missing(&selectors.detail_value))?;
                facts.insert(translate_nutrient(metric.trim()), detail_value(&value));
            }
        }

        Ok(facts)
    }
}

fn missing(selector: &str) -> ScrapeError {
    ScrapeError::MissingElement(selector.to_string())
}

/// Split a summary heading into `(label, value)`.
///
/// Token 0 is the amount, token 1 the label, the rest is the unit:
/// `"550 Калорійність ккал"` → `("Калорійність", "550 ккал")`. Without a
/// unit the value keeps its trailing space.
pub fn parse_heading(text: &str) -> ScrapeResult<(&str, String)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [amount, label, unit @ ..] => Ok((*label, format!("{amount} {}", unit.join(" ")))),
        _ => Err(ScrapeError::Extraction(text.to_string())),
    }
}

/// First four whitespace tokens of a detail value, concatenated.
pub fn detail_value(text: &str) -> String {
    text.split_whitespace().take(4).collect()
}

/// Script returning `{headings: [...], details: [[[metric, value], ...], ...]}`.
pub fn gather_script(selectors: &Selectors) -> String {
    let q = |s: &str| Value::from(s).to_string();
    format!(
        r#"(() => {{
  const headings = Array.from(document.querySelectorAll({heading_item})).map((item) => {{
    const node = item.querySelector({heading_text});
    return node ? node.textContent.trim() : null;
  }});
  const details = Array.from(document.querySelectorAll({details_column})).map((column) =>
    Array.from(column.querySelectorAll({detail_item})).map((entry) => {{
      const metric = entry.querySelector({detail_metric});
      const value = entry.querySelector({detail_value});
      return [metric ? metric.innerText : null, value ? value.innerText : null];
    }})
  );
  return {{ headings, details }};
}})()"#,
        heading_item = q(&selectors.heading_item),
        heading_text = q(&selectors.heading_text),
        details_column = q(&selectors.details_column),
        detail_item = q(&selectors.detail_item),
        detail_metric = q(&selectors.detail_metric),
        detail_value = q(&selectors.detail_value),
    )
}

/// Drives one browser session per product.
pub struct NutritionExtractor {
    launcher: Arc<dyn BrowserLauncher>,
    selectors: Selectors,
    render_delay: Duration,
    script: String,
}

impl NutritionExtractor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, selectors: Selectors, render_delay: Duration) -> Self {
        let script = gather_script(&selectors);
        Self {
            launcher,
            selectors,
            render_delay,
            script,
        }
    }

    /// Launch a browser, extract, and tear the browser down whatever happened.
    pub async fn scrape(&self, url: &str) -> ScrapeResult<NutritionFacts> {
        let browser = self.launcher.launch().await.map_err(ScrapeError::Browser)?;

        let result = self.scrape_with(browser.as_ref(), url).await;

        if let Err(e) = browser.shutdown().await {
            tracing::warn!(url, error = %e, "browser shutdown failed");
        }
        result
    }

    async fn scrape_with(&self, browser: &dyn Renderer, url: &str) -> ScrapeResult<NutritionFacts> {
        let mut ctx = browser.new_context().await.map_err(ScrapeError::Browser)?;

        let result = self.extract(ctx.as_mut(), url).await;

        if let Err(e) = ctx.close().await {
            tracing::debug!(url, error = %e, "page close failed");
        }
        result
    }

    /// Navigate, open the accordion and read both passes from `ctx`.
    pub async fn extract(&self, ctx: &mut dyn RenderContext, url: &str) -> ScrapeResult<NutritionFacts> {
        ctx.navigate(url).await.map_err(ScrapeError::Browser)?;
        tokio::time::sleep(self.render_delay).await;

        ctx.click(&self.selectors.accordion_button)
            .await
            .map_err(ScrapeError::Browser)?;
        tokio::time::sleep(self.render_delay).await;

        let value = ctx.execute_js(&self.script).await.map_err(ScrapeError::Browser)?;
        let raw: RawNutrition = serde_json::from_value(value)
            .map_err(|e| ScrapeError::Extraction(format!("unexpected page data: {e}")))?;

        let facts = raw.into_facts(&self.selectors)?;
        tracing::debug!(url, nutrients = facts.len(), "nutrition extracted");
        Ok(facts)
    }
}
