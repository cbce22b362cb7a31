//! Deployment configuration for the vector store.
//!
//! Every setting is fixed for the lifetime of a [`crate::ChunkVault`]. Values
//! come from [`StoreConfig::default`] and may be overridden through
//! environment variables:
//! - `CHUNKVAULT_DB` - root directory of the on-disk store
//! - `CHUNKVAULT_COLLECTION` - collection (table) name
//! - `CHUNKVAULT_DIMENSION` - vector dimensionality
//! - `CHUNKVAULT_METRIC` - distance metric (only `cosine`)

use crate::domain::error::ConfigError;
use crate::domain::values::distance::DistanceMetric;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT: &str = ".chunkvault/state/vectors";
pub const DEFAULT_COLLECTION: &str = "code_chunks";
/// nomic-embed-text output width.
pub const DEFAULT_DIMENSION: usize = 768;
/// Database file created inside the root directory.
pub const DB_FILE: &str = "vectors.db";
/// Table holding per-collection schema facts; not usable as a collection name.
pub const CATALOG_TABLE: &str = "vault_collections";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub collection: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            collection: DEFAULT_COLLECTION.to_string(),
            dimension: DEFAULT_DIMENSION,
            metric: DistanceMetric::Cosine,
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(root) = lookup("CHUNKVAULT_DB") {
            config.root = PathBuf::from(root);
        }
        if let Some(collection) = lookup("CHUNKVAULT_COLLECTION") {
            config.collection = collection;
        }
        if let Some(dim) = lookup("CHUNKVAULT_DIMENSION") {
            config.dimension = dim
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDimension(dim.clone()))?;
        }
        if let Some(metric) = lookup("CHUNKVAULT_METRIC") {
            config.metric = metric.parse().map_err(|_| ConfigError::UnknownMetric(metric))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// The collection name is interpolated into SQL as an identifier, so it
    /// is restricted to `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier(&self.collection)
            || self.collection.to_lowercase().starts_with("sqlite_")
            || self.collection.eq_ignore_ascii_case(CATALOG_TABLE)
        {
            return Err(ConfigError::InvalidCollection(self.collection.clone()));
        }
        if self.dimension == 0 {
            return Err(ConfigError::InvalidDimension("0".into()));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
