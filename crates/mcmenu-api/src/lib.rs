//! McMenu API: read-only HTTP access to a scraped product snapshot.

pub mod config;
pub mod error;
pub mod rest;
pub mod service;

pub use error::{ApiError, ApiResult};
pub use service::ProductService;
