use crate::domain::error::VectorStoreError;
use crate::domain::ports::vector_store::{CollectionInfo, HealthDetails, VectorStore};
use std::sync::Arc;

/// Read-only status queries. Health calls never fail; `collection_info`
/// does when there is nothing to report on.
pub struct DiagnosticsUseCase {
    store: Arc<dyn VectorStore>,
}

impl DiagnosticsUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub async fn check_health(&self) -> bool {
        match self.store.connect().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Vector store health check failed: {e}");
                false
            }
        }
    }

    pub async fn health_details(&self) -> HealthDetails {
        let unavailable = |error: String| HealthDetails {
            error: Some(error),
            ..HealthDetails::default()
        };

        if let Err(e) = self.store.connect().await {
            tracing::warn!("Vector store unreachable: {e}");
            return unavailable(e.to_string());
        }

        match self.store.collection_info().await {
            Ok(Some(info)) => HealthDetails {
                store_reachable: true,
                collection_exists: true,
                record_count: info.record_count,
                error: None,
            },
            Ok(None) => HealthDetails {
                store_reachable: true,
                collection_exists: false,
                record_count: 0,
                error: Some(format!(
                    "Collection \"{}\" not found. Run the indexer to create it.",
                    self.store.collection_name()
                )),
            },
            Err(e) => {
                tracing::warn!("Vector store health probe failed: {e}");
                unavailable(e.to_string())
            }
        }
    }

    pub async fn collection_info(&self) -> Result<CollectionInfo, VectorStoreError> {
        self.store
            .collection_info()
            .await?
            .ok_or_else(|| VectorStoreError::CollectionNotFound(self.store.collection_name().to_string()))
    }
}
