//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `BrowserLauncher`, `Renderer` and `RenderContext` traits that
//! abstract over the browser engine (currently Chromium via chromiumoxide).
//! The nutrition extractor launches one browser per product, so a launcher
//! hands out whole browsers rather than tabs of a shared one.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// Starts a fresh browser process.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a new browser. The caller owns it and must shut it down.
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}

/// A running browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL and wait for the load to finish.
    async fn navigate(&mut self, url: &str) -> Result<()>;
    /// Click the first element matching a CSS selector. Fails if none matches.
    async fn click(&self, selector: &str) -> Result<()>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}
