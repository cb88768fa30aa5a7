//! End-to-end scrape runs against a mock menu site and a fake browser.

use async_trait::async_trait;
use mcmenu::{ProductRecord, SnapshotReader};
use mcmenu_scraper::renderer::{BrowserLauncher, RenderContext, Renderer};
use mcmenu_scraper::{ScrapeConfig, ScrapeError, ScrapeOrchestrator, ScrapePhase};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ── Fake browser ──

/// What the fake browser "renders" for each product URL.
#[derive(Default)]
struct FakeSite {
    payloads: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    /// URLs whose accordion button is missing.
    broken: HashSet<String>,
}

struct FakeLauncher(Arc<FakeSite>);
struct FakeBrowser(Arc<FakeSite>);
struct FakeContext {
    site: Arc<FakeSite>,
    url: String,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> anyhow::Result<Box<dyn Renderer>> {
        Ok(Box::new(FakeBrowser(Arc::clone(&self.0))))
    }
}

#[async_trait]
impl Renderer for FakeBrowser {
    async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
        Ok(Box::new(FakeContext {
            site: Arc::clone(&self.0),
            url: String::new(),
        }))
    }
    async fn shutdown(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        self.url = url.to_string();
        Ok(())
    }
    async fn click(&self, selector: &str) -> anyhow::Result<()> {
        if self.site.broken.contains(&self.url) {
            anyhow::bail!("no element matches `{selector}`");
        }
        Ok(())
    }
    async fn execute_js(&self, _script: &str) -> anyhow::Result<Value> {
        if let Some(delay) = self.site.delays.get(&self.url) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self
            .site
            .payloads
            .get(&self.url)
            .cloned()
            .unwrap_or_else(|| json!({ "headings": [], "details": [] })))
    }
    async fn close(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}

// ── Mock menu site ──

const TEST_USER_AGENT: &str = "McMenuTest/1.0";

/// Mount the listing page with one product anchor per entry.
async fn mount_listing(server: &MockServer, count: usize) -> Vec<String> {
    let anchors: String = (0..count)
        .map(|i| format!(r#"<li><a class="cmp-category__item-link" href="/product/{i}.html">{i}</a></li>"#))
        .collect();

    Mock::given(method("GET"))
        .and(path("/eat/fullmenu.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("<ul>{anchors}</ul>")))
        .mount(server)
        .await;

    (0..count)
        .map(|i| format!("{}/product/{i}.html", server.uri()))
        .collect()
}

fn product_page(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<span class="cmp-product-details-main__heading-title"> {name} </span>
           <div class="cmp-text"><p>{name} description</p></div>"#
    ))
}

fn product_mock(i: usize) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path(format!("/product/{i}.html")))
        .and(header("user-agent", TEST_USER_AGENT))
}

/// Mount a listing page plus one product page per name, each expected
/// exactly once; returns product URLs.
async fn mount_menu(server: &MockServer, names: &[&str]) -> Vec<String> {
    let urls = mount_listing(server, names.len()).await;
    for (i, name) in names.iter().enumerate() {
        product_mock(i)
            .respond_with(product_page(name))
            .expect(1)
            .mount(server)
            .await;
    }
    urls
}

/// Serves a product page and records when each request arrived.
struct ArrivalLog {
    page: ResponseTemplate,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for ArrivalLog {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        self.page.clone()
    }
}

fn config(server: &MockServer, output: PathBuf) -> ScrapeConfig {
    ScrapeConfig {
        listing_url: format!("{}/eat/fullmenu.html", server.uri()),
        submit_delay_ms: 0,
        render_delay_ms: 0,
        user_agent: TEST_USER_AGENT.into(),
        output,
        ..ScrapeConfig::default()
    }
}

fn names(records: &[ProductRecord]) -> Vec<&str> {
    records.iter().filter_map(ProductRecord::name).collect()
}

// ── Tests ──

#[tokio::test]
async fn scrape_writes_merged_records() {
    let server = MockServer::start().await;
    let urls = mount_menu(&server, &["Біг Мак", "Картопля Фрі"]).await;

    let mut site = FakeSite::default();
    site.payloads.insert(
        urls[0].clone(),
        json!({
            "headings": ["550 Калорійність ккал", "25 Жири г"],
            "details": [[["Сіль:", "2.2 г 37 % ДДН"], ["Порція:", "214 г"]]]
        }),
    );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("product_info.json");
    let mut orchestrator =
        ScrapeOrchestrator::new(config(&server, output.clone()), Arc::new(FakeLauncher(Arc::new(site))))
            .unwrap();
    assert_eq!(orchestrator.phase(), ScrapePhase::Idle);

    let report = orchestrator.run_and_save().await.unwrap();
    assert_eq!(orchestrator.phase(), ScrapePhase::Done);
    assert_eq!(report.links_found, 2);
    assert!(report.failures.is_empty());

    let loaded = SnapshotReader::read_from_file(&output).unwrap();
    assert_eq!(loaded, report.snapshot);
    assert_eq!(loaded.len(), 2);

    let big_mac = loaded.find_by_name("Біг Мак").unwrap();
    assert_eq!(big_mac.description(), Some("Біг Мак description"));
    let keys: Vec<_> = big_mac.keys().collect();
    assert_eq!(keys, vec!["name", "description", "calories", "fats", "salt", "portion"]);
    assert_eq!(big_mac.field("calories"), Some(&json!("550 ккал")));
    assert_eq!(big_mac.field("salt"), Some(&json!("2.2г37%")));

    let fries = loaded.find_by_name("Картопля Фрі").unwrap();
    assert_eq!(fries.len(), 2);
}

#[tokio::test]
async fn records_land_in_completion_order() {
    let server = MockServer::start().await;
    let urls = mount_menu(&server, &["Slow", "Fast"]).await;

    let mut site = FakeSite::default();
    site.delays.insert(urls[0].clone(), Duration::from_millis(300));

    let dir = tempfile::tempdir().unwrap();
    let mut orchestrator = ScrapeOrchestrator::new(
        config(&server, dir.path().join("out.json")),
        Arc::new(FakeLauncher(Arc::new(site))),
    )
    .unwrap();

    let report = orchestrator.run().await.unwrap();
    assert_eq!(names(report.snapshot.records()), vec!["Fast", "Slow"]);
}

#[tokio::test]
async fn concurrency_never_exceeds_limit() {
    let server = MockServer::start().await;
    let product_names: Vec<String> = (0..12).map(|i| format!("Product {i}")).collect();
    let refs: Vec<&str> = product_names.iter().map(String::as_str).collect();
    let urls = mount_menu(&server, &refs).await;

    let mut site = FakeSite::default();
    for url in &urls {
        site.delays.insert(url.clone(), Duration::from_millis(40));
    }

    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(&server, dir.path().join("out.json"));
    cfg.concurrency = 3;
    let mut orchestrator =
        ScrapeOrchestrator::new(cfg, Arc::new(FakeLauncher(Arc::new(site)))).unwrap();

    let report = orchestrator.run().await.unwrap();
    assert_eq!(report.snapshot.len(), 12);
    assert_eq!(report.peak_in_flight, 3);
}

#[tokio::test]
async fn product_requests_are_spaced_by_submit_delay() {
    let server = MockServer::start().await;
    let urls = mount_listing(&server, 4).await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    for i in 0..urls.len() {
        product_mock(i)
            .respond_with(ArrivalLog {
                page: product_page(&format!("Product {i}")),
                arrivals: Arc::clone(&arrivals),
            })
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut site = FakeSite::default();
    for url in &urls {
        site.delays.insert(url.clone(), Duration::from_millis(10));
    }

    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(&server, dir.path().join("out.json"));
    cfg.concurrency = 1;
    cfg.submit_delay_ms = 50;
    let mut orchestrator =
        ScrapeOrchestrator::new(cfg, Arc::new(FakeLauncher(Arc::new(site)))).unwrap();

    let report = orchestrator.run().await.unwrap();
    assert_eq!(report.snapshot.len(), 4);
    assert_eq!(report.peak_in_flight, 1);
    assert!(report.elapsed >= Duration::from_millis(150), "took {:?}", report.elapsed);

    let arrivals = arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 4);
    for pair in arrivals.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(gap >= Duration::from_millis(40), "product requests {gap:?} apart");
    }
}

#[tokio::test]
async fn failed_product_is_isolated() {
    let server = MockServer::start().await;
    let urls = mount_menu(&server, &["Good", "Broken", "Also Good"]).await;

    let mut site = FakeSite::default();
    site.broken.insert(urls[1].clone());

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    let mut orchestrator =
        ScrapeOrchestrator::new(config(&server, output.clone()), Arc::new(FakeLauncher(Arc::new(site))))
            .unwrap();

    let report = orchestrator.run_and_save().await.unwrap();
    assert_eq!(report.snapshot.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, urls[1]);
    assert!(matches!(report.failures[0].error, ScrapeError::Browser(_)));

    let loaded = SnapshotReader::read_from_file(&output).unwrap();
    assert!(loaded.find_by_name("Broken").is_none());
}

#[tokio::test]
async fn fail_fast_aborts_without_writing() {
    let server = MockServer::start().await;
    let urls = mount_menu(&server, &["Broken"]).await;

    let mut site = FakeSite::default();
    site.broken.insert(urls[0].clone());

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    let mut cfg = config(&server, output.clone());
    cfg.fail_fast = true;
    let mut orchestrator =
        ScrapeOrchestrator::new(cfg, Arc::new(FakeLauncher(Arc::new(site)))).unwrap();

    match orchestrator.run_and_save().await {
        Err(ScrapeError::ProductFailed { url, .. }) => assert_eq!(url, urls[0]),
        other => panic!("expected ProductFailed, got {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn fail_fast_stops_submitting_after_first_failure() {
    let server = MockServer::start().await;
    let urls = mount_listing(&server, 3).await;
    product_mock(0)
        .respond_with(product_page("Broken"))
        .expect(1)
        .mount(&server)
        .await;
    for i in 1..urls.len() {
        product_mock(i)
            .respond_with(product_page("Never fetched"))
            .expect(0)
            .mount(&server)
            .await;
    }

    let mut site = FakeSite::default();
    site.broken.insert(urls[0].clone());

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    let mut cfg = config(&server, output.clone());
    cfg.fail_fast = true;
    cfg.submit_delay_ms = 100;
    let mut orchestrator =
        ScrapeOrchestrator::new(cfg, Arc::new(FakeLauncher(Arc::new(site)))).unwrap();

    match orchestrator.run_and_save().await {
        Err(ScrapeError::ProductFailed { url, .. }) => assert_eq!(url, urls[0]),
        other => panic!("expected ProductFailed, got {other:?}"),
    }
    assert_eq!(orchestrator.phase(), ScrapePhase::Done);
    assert!(!output.exists());
}

#[tokio::test]
async fn listing_failure_yields_empty_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    let mut orchestrator = ScrapeOrchestrator::new(
        config(&server, output.clone()),
        Arc::new(FakeLauncher(Arc::new(FakeSite::default()))),
    )
    .unwrap();

    let report = orchestrator.run_and_save().await.unwrap();
    assert_eq!(report.links_found, 0);
    assert!(report.snapshot.is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}
