pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::diagnostics::DiagnosticsUseCase;
use crate::application::indexing::IndexingUseCase;
use crate::application::search::SearchUseCase;
use crate::config::StoreConfig;
use crate::domain::entities::vector_record::{SearchResult, VectorRecord};
use crate::domain::error::{ConfigError, VectorStoreError};
use crate::domain::ports::vector_store::{CollectionInfo, HealthDetails, VectorStore};
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use std::sync::Arc;

pub use crate::domain::ports::vector_store::DEFAULT_SEARCH_LIMIT;

/// Caller-owned handle to one vector collection.
///
/// Construction performs no I/O; the store is opened by the first call that
/// needs it and the handle is reused for the lifetime of the vault.
pub struct ChunkVault {
    indexing_uc: IndexingUseCase,
    search_uc: SearchUseCase,
    diagnostics_uc: DiagnosticsUseCase,
}

impl ChunkVault {
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_store(Arc::new(SqliteVectorStore::new(config))))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn with_store(store: Arc<dyn VectorStore>) -> Self {
        Self {
            indexing_uc: IndexingUseCase::new(store.clone()),
            search_uc: SearchUseCase::new(store.clone()),
            diagnostics_uc: DiagnosticsUseCase::new(store),
        }
    }

    // Delegating methods
    pub async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        self.indexing_uc.ensure_collection().await
    }

    pub async fn collection_exists(&self) -> bool {
        self.indexing_uc.collection_exists().await
    }

    pub async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        self.indexing_uc.upsert(records).await
    }

    pub async fn clear_collection(&self) -> Result<(), VectorStoreError> {
        self.indexing_uc.clear_collection().await
    }

    pub async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>, VectorStoreError> {
        self.search_uc.search(query, limit).await
    }

    pub async fn search_by_type(
        &self,
        query: &[f32],
        element_type: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        self.search_uc.search_by_type(query, element_type, limit).await
    }

    pub async fn check_health(&self) -> bool {
        self.diagnostics_uc.check_health().await
    }

    pub async fn health_details(&self) -> HealthDetails {
        self.diagnostics_uc.health_details().await
    }

    pub async fn collection_info(&self) -> Result<CollectionInfo, VectorStoreError> {
        self.diagnostics_uc.collection_info().await
    }
}
