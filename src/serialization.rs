use crate::{GraphDocument, GraphStore};
use anyhow::{Context, Result};
use log::error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Load a node document from disk
pub fn load_document(path: &Path) -> Result<GraphDocument> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open node document: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse node document: {}", path.display()))
}

/// Write a snapshot to disk as pretty two-space JSON, the same shape the
/// publish payload uses
pub fn save_snapshot(path: &Path, document: &GraphDocument) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create snapshot file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, document)
        .with_context(|| format!("Failed to write snapshot to: {}", path.display()))?;
    Ok(())
}

impl GraphStore {
    /// Load a store from a document on disk. A missing or malformed
    /// document degrades to an empty store; the failure is logged.
    pub fn load_from_path(path: &Path) -> Self {
        match load_document(path) {
            Ok(document) => Self::from_document(document),
            Err(err) => {
                error!("failed to load node document, starting empty: {err:#}");
                Self::new()
            }
        }
    }
}
