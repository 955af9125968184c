//! Snapshot file loading.
//!
//! Reads the four files named in `[snapshot]` and hands them to
//! [`Snapshot::new`], which validates that they describe the same corpus.

use anyhow::{Context, Result};
use originality_core::index::{FlatIndex, VectorIndex};
use originality_core::models::ProjectRecord;
use originality_core::snapshot::Snapshot;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Load and validate the snapshot described by `config`.
pub fn load_snapshot(config: &Config) -> Result<Snapshot> {
    let paths = &config.snapshot;
    let dims = config.dims();

    let records = read_metadata(&paths.meta_path)?;
    let all_time = read_index(&paths.index_all_path, dims)?;
    let recent = read_index(&paths.index_recent_path, dims)?;
    let recent_rows = read_row_ids(&paths.recent_row_ids_path)?;

    info!(
        meta = %paths.meta_path.display(),
        records = records.len(),
        "loaded snapshot files"
    );

    let snapshot = Snapshot::new(records, all_time, recent, recent_rows)
        .with_context(|| "Snapshot is inconsistent")?;
    Ok(snapshot)
}

fn read_metadata(path: &Path) -> Result<Vec<ProjectRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata file: {}", path.display()))
}

fn read_index(path: &Path, dims: usize) -> Result<Box<dyn VectorIndex>> {
    let blob = std::fs::read(path)
        .with_context(|| format!("Failed to read vector index: {}", path.display()))?;
    let index = FlatIndex::from_blob(dims, &blob)
        .with_context(|| format!("Invalid vector index: {}", path.display()))?;
    Ok(Box::new(index))
}

fn read_row_ids(path: &Path) -> Result<Vec<usize>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recent row ids: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse recent row ids: {}", path.display()))
}
