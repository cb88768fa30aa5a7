//! McMenu API server: entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use mcmenu_api::config::{resolve_snapshot_path, DEFAULT_ADDR};
use mcmenu_api::rest;
use mcmenu_api::ProductService;

#[derive(Parser)]
#[command(
    name = "mcmenu-api",
    about = "Read-only HTTP API over a McMenu product snapshot",
    version
)]
struct Cli {
    /// Path to the product snapshot JSON.
    /// Also reads from MCMENU_SNAPSHOT env var.
    #[arg(short, long)]
    snapshot: Option<String>,

    /// Listen address (host:port).
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: SocketAddr,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let snapshot_path = resolve_snapshot_path(cli.snapshot.as_deref());
    let service = ProductService::open(&snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", snapshot_path.display()))?;

    rest::serve(cli.addr, Arc::new(service)).await
}
