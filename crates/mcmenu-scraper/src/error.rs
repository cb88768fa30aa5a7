// Copyright 2026 McMenu Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by the scraping pipeline.

/// Everything that can go wrong while scraping.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid CSS selector `{0}`")]
    Selector(String),

    #[error("browser error: {0:#}")]
    Browser(anyhow::Error),

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("malformed nutrition text: {0:?}")]
    Extraction(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] mcmenu::SnapshotError),

    #[error("config error: {0}")]
    Config(String),

    #[error("scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("product {url} failed: {source}")]
    ProductFailed {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
