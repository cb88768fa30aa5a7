//! Configuration loading and resolution.

use mcmenu::DEFAULT_SNAPSHOT_FILE;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Environment variable naming the snapshot file.
pub const SNAPSHOT_ENV: &str = "MCMENU_SNAPSHOT";

/// Resolve the snapshot path: explicit flag, then `MCMENU_SNAPSHOT`, then
/// `product_info.json` at the workspace root.
pub fn resolve_snapshot_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(SNAPSHOT_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    default_snapshot_path()
}

/// `product_info.json` next to the workspace manifest, independent of the
/// process working directory.
pub fn default_snapshot_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(DEFAULT_SNAPSHOT_FILE)
}
