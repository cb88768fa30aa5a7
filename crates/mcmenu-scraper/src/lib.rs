// Copyright 2026 McMenu Contributors
// SPDX-License-Identifier: Apache-2.0

//! McMenu scraper. Collects menu product links, parses product pages and
//! drives headless Chromium for nutrition facts.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod nutrition;
pub mod orchestrator;
pub mod renderer;

pub use config::{ScrapeConfig, Selectors};
pub use error::{ScrapeError, ScrapeResult};
pub use orchestrator::{ProductFailure, ScrapeOrchestrator, ScrapePhase, ScrapeReport};
