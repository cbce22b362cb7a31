use crate::domain::entities::vector_record::VectorRecord;
use crate::domain::error::VectorStoreError;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;

/// Collection lifecycle and batch writes.
pub struct IndexingUseCase {
    store: Arc<dyn VectorStore>,
}

impl IndexingUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Only guarantees a live connection; the collection itself is created
    /// by the first upsert.
    pub async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        self.store.connect().await
    }

    pub async fn collection_exists(&self) -> bool {
        self.store.collection_exists().await
    }

    pub async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }
        self.store.upsert(records).await
    }

    pub async fn clear_collection(&self) -> Result<(), VectorStoreError> {
        self.store.clear().await
    }
}
