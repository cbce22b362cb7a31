use std::path::PathBuf;
use thiserror::Error;

/// Underlying cause carried by every store-level failure.
#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Collection stores {expected}-dimensional vectors, got {actual}")]
    DimensionConflict { expected: usize, actual: usize },

    #[error("Connection lock poisoned: {0}")]
    Poisoned(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Vector store unavailable at \"{}\": {}", .path.display(), .source)]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: StorageFault,
    },

    #[error("Vector has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector component {index} is not a finite number")]
    NonFiniteComponent { index: usize },

    #[error("Failed to upsert {count} records into \"{collection}\": {source}")]
    UpsertFailed {
        count: usize,
        collection: String,
        #[source]
        source: StorageFault,
    },

    #[error("Failed to search in \"{collection}\": {source}")]
    SearchFailed {
        collection: String,
        #[source]
        source: StorageFault,
    },

    #[error("Failed to clear \"{collection}\": {source}")]
    ClearFailed {
        collection: String,
        #[source]
        source: StorageFault,
    },

    #[error("Collection \"{0}\" does not exist. Run the indexer first.")]
    CollectionNotFound(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Unknown distance metric: {0}")]
    UnknownMetric(String),
}
