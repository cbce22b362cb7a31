use crate::domain::error::VectorStoreError;
use serde::{Deserialize, Serialize};

/// Metadata stored next to each vector and returned verbatim on retrieval.
/// Only `element_type` is ever interpreted by the store (exact-match filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPayload {
    pub file_path: String,
    #[serde(alias = "type")]
    pub element_type: String,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub content: String,
}

/// The unit of storage. `id` is the upsert match key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, payload: ChunkPayload) -> Self {
        Self {
            id: id.into(),
            vector,
            payload,
        }
    }
}

/// Rejects a vector whose length differs from the collection's dimension
/// or that holds a NaN or infinite component.
pub fn check_vector(vector: &[f32], expected: usize) -> Result<(), VectorStoreError> {
    if vector.len() != expected {
        return Err(VectorStoreError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    if let Some(index) = vector.iter().position(|x| !x.is_finite()) {
        return Err(VectorStoreError::NonFiniteComponent { index });
    }
    Ok(())
}

/// Validates a whole batch; the first offending record fails it.
pub fn check_batch(records: &[VectorRecord], expected: usize) -> Result<(), VectorStoreError> {
    records.iter().try_for_each(|r| check_vector(&r.vector, expected))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f64,
    pub record: VectorRecord,
}
