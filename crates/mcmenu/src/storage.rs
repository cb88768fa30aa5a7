//! JSON snapshot reader/writer.
//!
//! A snapshot is a single UTF-8 JSON array, indented with four spaces and
//! with non-ASCII text written as-is. Writing truncates the target file in
//! place; there is no temp-file-then-rename step.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::types::{ProductSnapshot, SnapshotResult};

/// File name used when no output path is given.
pub const DEFAULT_SNAPSHOT_FILE: &str = "product_info.json";

const INDENT: &[u8] = b"    ";

/// Writer for snapshot files.
pub struct SnapshotWriter;

/// Reader for snapshot files.
pub struct SnapshotReader;

impl SnapshotWriter {
    /// Write a snapshot to a file, replacing whatever was there.
    pub fn write_to_file(snapshot: &ProductSnapshot, path: &Path) -> SnapshotResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(path)?);
        Self::write_to(snapshot, &mut file)?;
        file.flush()?;

        tracing::info!(records = snapshot.len(), "Saved data to {}", path.display());
        Ok(())
    }

    /// Write a snapshot to any writer.
    pub fn write_to<W: Write>(snapshot: &ProductSnapshot, writer: &mut W) -> SnapshotResult<()> {
        let mut ser = Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(INDENT));
        snapshot.serialize(&mut ser)?;
        Ok(())
    }
}

impl SnapshotReader {
    /// Read a snapshot from a file.
    pub fn read_from_file(path: &Path) -> SnapshotResult<ProductSnapshot> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Read a snapshot from any reader.
    pub fn read_from<R: Read>(reader: R) -> SnapshotResult<ProductSnapshot> {
        let snapshot: ProductSnapshot = serde_json::from_reader(reader)?;
        tracing::debug!(records = snapshot.len(), "snapshot parsed");
        Ok(snapshot)
    }
}
