// Copyright 2026 McMenu Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scrape orchestration.
//!
//! A run moves through `Idle → LinksFetched → Scraping → Done`. Product
//! tasks are spawned one at a time with a fixed pause between submissions,
//! and each must hold a semaphore permit for its whole fetch. Finished
//! records travel over an mpsc channel to a single collecting task, so the
//! snapshot is in completion order.
//!
//! A failed product is recorded in the report and the run continues,
//! unless `fail_fast` is set, in which case the first failure ends the run
//! and no further tasks are submitted. Tasks already in flight are not
//! cancelled.

use crate::acquisition::{FieldParser, HttpClient, LinkCollector};
use crate::config::ScrapeConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::nutrition::NutritionExtractor;
use crate::renderer::BrowserLauncher;
use mcmenu::{ProductRecord, ProductSnapshot, SnapshotWriter};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrapePhase {
    Idle,
    LinksFetched,
    Scraping,
    Done,
}

/// A product that could not be scraped.
#[derive(Debug)]
pub struct ProductFailure {
    pub url: String,
    pub error: ScrapeError,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Successful records in completion order.
    pub snapshot: ProductSnapshot,
    pub failures: Vec<ProductFailure>,
    /// Links found on the listing page.
    pub links_found: usize,
    /// Highest number of product tasks holding a permit at once.
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

type TaskOutcome = Result<ProductRecord, ProductFailure>;

/// Fetches and assembles one product record.
pub struct ProductFetcher {
    client: HttpClient,
    fields: FieldParser,
    nutrition: NutritionExtractor,
}

impl ProductFetcher {
    pub fn new(client: HttpClient, fields: FieldParser, nutrition: NutritionExtractor) -> Self {
        Self {
            client,
            fields,
            nutrition,
        }
    }

    /// Product page GET, field parsing, then the browser pass.
    ///
    /// A non-success product page is still parsed and falls back to the
    /// sentinel name/description.
    pub async fn fetch(&self, url: &str) -> ScrapeResult<ProductRecord> {
        let page = self.client.get_as_browser(url).await?;
        if !page.is_success() {
            tracing::debug!(url, status = page.status, "product page returned an error status");
        }
        let fields = self.fields.parse_page(&page.body);

        let nutrition = self.nutrition.scrape(url).await?;

        let mut record = ProductRecord::new(fields.name, fields.description);
        nutrition.merge_into(&mut record);

        tracing::info!(
            url,
            "Fetched details for product: {}",
            record.name().unwrap_or_default()
        );
        Ok(record)
    }
}

/// In-flight task counter with a high-water mark.
#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(self: &Arc<Self>) -> InFlightGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(Arc::clone(self))
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives one scrape run.
pub struct ScrapeOrchestrator {
    config: ScrapeConfig,
    links: LinkCollector,
    fetcher: Arc<ProductFetcher>,
    phase: ScrapePhase,
}

impl ScrapeOrchestrator {
    pub fn new(config: ScrapeConfig, launcher: Arc<dyn BrowserLauncher>) -> ScrapeResult<Self> {
        config.validate()?;

        let client = HttpClient::new(config.user_agent.as_str())?;
        let links = LinkCollector::new(client.clone(), &config.selectors.product_link)?;
        let fields = FieldParser::new(&config.selectors)?;
        let nutrition =
            NutritionExtractor::new(launcher, config.selectors.clone(), config.render_delay());

        Ok(Self {
            links,
            fetcher: Arc::new(ProductFetcher::new(client, fields, nutrition)),
            config,
            phase: ScrapePhase::Idle,
        })
    }

    pub fn phase(&self) -> ScrapePhase {
        self.phase
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    fn enter(&mut self, phase: ScrapePhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "scrape phase");
        self.phase = phase;
    }

    /// Collect links and scrape every product.
    pub async fn run(&mut self) -> ScrapeResult<ScrapeReport> {
        let started = Instant::now();

        let links = self.links.collect(&self.config.listing_url).await?;
        let links_found = links.len();
        self.enter(ScrapePhase::LinksFetched);

        self.enter(ScrapePhase::Scraping);
        let (tx, rx) = mpsc::unbounded_channel::<TaskOutcome>();
        let collector = tokio::spawn(collect(rx, self.config.fail_fast));
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let in_flight = Arc::new(InFlight::default());
        let mut tasks = Vec::with_capacity(links_found);

        for (i, url) in links.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.submit_delay()).await;
            }
            if collector.is_finished() {
                tracing::warn!(submitted = i, total = links_found, "stopping submissions after a failed product");
                break;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            let in_flight = Arc::clone(&in_flight);
            let tx = tx.clone();

            tasks.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let _guard = in_flight.enter();
                let result = fetcher.fetch(&url).await;
                let outcome = result.map_err(|error| ProductFailure { url, error });
                // The collector is gone only after a fail-fast abort
                let _ = tx.send(outcome);
            }));
        }
        drop(tx);

        let collected = collector.await?;
        self.enter(ScrapePhase::Done);

        let (records, failures) = collected.map_err(|failure| ScrapeError::ProductFailed {
            url: failure.url,
            source: Box::new(failure.error),
        })?;

        for task in tasks {
            task.await?;
        }

        let report = ScrapeReport {
            snapshot: ProductSnapshot::new(records),
            failures,
            links_found,
            peak_in_flight: in_flight.peak(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            links = report.links_found,
            scraped = report.snapshot.len(),
            failed = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scrape finished"
        );
        Ok(report)
    }

    /// [`run`](Self::run), then write the snapshot to the configured output.
    ///
    /// Nothing is written when the run itself fails.
    pub async fn run_and_save(&mut self) -> ScrapeResult<ScrapeReport> {
        let report = self.run().await?;
        SnapshotWriter::write_to_file(&report.snapshot, &self.config.output)?;
        Ok(report)
    }
}

/// Single consumer for task outcomes.
async fn collect(
    mut rx: mpsc::UnboundedReceiver<TaskOutcome>,
    fail_fast: bool,
) -> Result<(Vec<ProductRecord>, Vec<ProductFailure>), ProductFailure> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    while let Some(outcome) = rx.recv().await {
        match outcome {
            Ok(record) => records.push(record),
            Err(failure) => {
                tracing::warn!(url = %failure.url, error = %failure.error, "product failed");
                if fail_fast {
                    return Err(failure);
                }
                failures.push(failure);
            }
        }
    }

    Ok((records, failures))
}
