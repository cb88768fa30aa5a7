//! McMenu: data model and JSON snapshot storage for scraped menu products.

pub mod storage;
pub mod types;

pub use storage::{SnapshotReader, SnapshotWriter, DEFAULT_SNAPSHOT_FILE};
pub use types::*;
