use crate::domain::entities::vector_record::{SearchResult, VectorRecord};
use crate::domain::error::VectorStoreError;
use chrono::{DateTime, Utc};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Optional predicates pushed down into the nearest-neighbor scan.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub element_type: Option<String>,
}

impl SearchFilter {
    pub fn by_type(element_type: impl Into<String>) -> Self {
        Self {
            element_type: Some(element_type.into()),
        }
    }
}

/// Schema facts recorded when a collection was first written.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub name: String,
    pub record_count: u64,
    pub vector_size: usize,
    pub distance_metric: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetails {
    pub store_reachable: bool,
    pub collection_exists: bool,
    pub record_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Vector dimensionality every write and query must match.
    fn dimension(&self) -> usize;

    fn collection_name(&self) -> &str;

    /// Establishes (or reuses) the connection.
    async fn connect(&self) -> Result<(), VectorStoreError>;

    /// Any fault while probing reads as "absent".
    async fn collection_exists(&self) -> bool;

    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError>;

    async fn search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;

    async fn clear(&self) -> Result<(), VectorStoreError>;

    /// `None` when the collection does not exist.
    async fn collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError>;
}
