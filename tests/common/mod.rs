//! Shared test helpers.
#![allow(dead_code)]

use chunkvault::config::StoreConfig;
use chunkvault::domain::entities::vector_record::{ChunkPayload, VectorRecord};
use chunkvault::ChunkVault;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DIM: usize = 4;

/// A vault over a fresh temp dir. The store root is a not-yet-created
/// subdirectory so tests can tell whether any I/O happened.
pub fn setup() -> (TempDir, ChunkVault) {
    setup_with_dimension(DIM)
}

pub fn setup_with_dimension(dimension: usize) -> (TempDir, ChunkVault) {
    let dir = TempDir::new().unwrap();
    let vault = ChunkVault::new(config_for(&dir).with_dimension(dimension)).unwrap();
    (dir, vault)
}

pub fn config_for(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(store_root(dir)).with_dimension(DIM)
}

pub fn store_root(dir: &TempDir) -> PathBuf {
    dir.path().join("state").join("vectors")
}

pub fn make_record(id: &str, vector: Vec<f32>, element_type: &str) -> VectorRecord {
    VectorRecord::new(
        id,
        vector,
        ChunkPayload {
            file_path: format!("src/{id}.tsx"),
            element_type: element_type.to_string(),
            name: id.to_string(),
            start_line: 1,
            end_line: 20,
            content: format!("export function {id}() {{}}"),
        },
    )
}

/// Unit vector along axis `i` of a `DIM`-wide space.
pub fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

pub fn ids(results: &[chunkvault::domain::entities::vector_record::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.record.id.as_str()).collect()
}
