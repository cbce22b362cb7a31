use crate::domain::entities::vector_record::{check_vector, SearchResult};
use crate::domain::error::VectorStoreError;
use crate::domain::ports::vector_store::{SearchFilter, VectorStore};
use std::sync::Arc;

pub struct SearchUseCase {
    store: Arc<dyn VectorStore>,
}

impl SearchUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Top `limit` records by cosine similarity, best first. An absent
    /// collection yields an empty list.
    pub async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>, VectorStoreError> {
        check_vector(query, self.store.dimension())?;
        self.store.search(query, &SearchFilter::default(), limit).await
    }

    /// Same as [`Self::search`], restricted to records whose element type
    /// equals `element_type` exactly.
    pub async fn search_by_type(
        &self,
        query: &[f32],
        element_type: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        check_vector(query, self.store.dimension())?;
        self.store
            .search(query, &SearchFilter::by_type(element_type), limit)
            .await
    }
}
