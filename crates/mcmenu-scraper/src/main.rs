// Copyright 2026 McMenu Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use mcmenu_scraper::renderer::chromium::ChromiumLauncher;
use mcmenu_scraper::{ScrapeConfig, ScrapeOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "mcmenu-scraper",
    about = "McMenu scraper: menu products and nutrition facts into a JSON snapshot",
    version
)]
struct Cli {
    /// JSON config file (selectors, delays, concurrency, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listing page to collect product links from
    #[arg(long)]
    url: Option<String>,

    /// Snapshot output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum concurrent product tasks
    #[arg(long)]
    concurrency: Option<usize>,

    /// Abort the run on the first failed product
    #[arg(long)]
    fail_fast: bool,

    /// Chromium executable (discovered when omitted)
    #[arg(long)]
    chromium: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::from_file(path)?,
            None => ScrapeConfig::default(),
        };

        if let Some(url) = self.url {
            config.listing_url = url;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if self.chromium.is_some() {
            config.chromium_path = self.chromium;
        }
        config.fail_fast |= self.fail_fast;

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let started = Instant::now();
    let config = cli.into_config()?;

    tracing::info!(url = %config.listing_url, concurrency = config.concurrency, "starting scrape");

    let launcher = Arc::new(ChromiumLauncher::new(config.chromium_path.clone()));
    let output = config.output.clone();
    let mut orchestrator = ScrapeOrchestrator::new(config, launcher)?;

    let report = orchestrator
        .run_and_save()
        .await
        .with_context(|| format!("scrape failed; {} not written", output.display()))?;

    for failure in &report.failures {
        tracing::warn!(url = %failure.url, error = %failure.error, "skipped product");
    }
    if !report.failures.is_empty() {
        tracing::warn!(
            failed = report.failures.len(),
            scraped = report.snapshot.len(),
            "some products could not be scraped"
        );
    }

    tracing::info!(
        "Total execution time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
