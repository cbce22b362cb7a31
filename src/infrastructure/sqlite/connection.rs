use crate::config::StoreConfig;
use crate::domain::error::{StorageFault, VectorStoreError};
use crate::infrastructure::sqlite::codec::blob_distance;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;

pub type SharedConnection = Arc<Mutex<Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Lazily opened, process-shared handle to the on-disk store.
///
/// The first caller creates the root directory and opens the database;
/// concurrent cold-start callers wait on the same initialization and all
/// receive the same handle. A failed open is not cached, so a later call
/// retries.
pub struct ConnectionManager {
    config: StoreConfig,
    handle: OnceCell<SharedConnection>,
}

impl ConnectionManager {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    pub async fn get(&self) -> Result<SharedConnection, VectorStoreError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let root = self.config.root().to_path_buf();
                let db_path = self.config.db_path();
                let opened = tokio::task::spawn_blocking(move || open_store(&root, &db_path))
                    .await
                    .map_err(StorageFault::from)
                    .and_then(|r| r);
                match opened {
                    Ok(conn) => Ok(Arc::new(Mutex::new(conn))),
                    Err(source) => Err(VectorStoreError::StoreUnavailable {
                        path: self.config.root().to_path_buf(),
                        source,
                    }),
                }
            })
            .await?;
        Ok(Arc::clone(handle))
    }
}

fn open_store(root: &Path, db_path: &Path) -> Result<Connection, StorageFault> {
    std::fs::create_dir_all(root)?;
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    register_functions(&conn)?;
    tracing::debug!("Opened vector store at {}", db_path.display());
    Ok(conn)
}

/// Registers `cosine_distance(blob, blob)` so ranking runs inside SQLite.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "cosine_distance",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let a = ctx
                .get_raw(0)
                .as_blob()
                .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
            let b = ctx
                .get_raw(1)
                .as_blob()
                .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
            blob_distance(a, b).map_err(|e| rusqlite::Error::UserFunctionError(e.into()))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::codec::encode;

    #[test]
    fn test_cosine_distance_sql_function() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        let d: f64 = conn
            .query_row(
                "SELECT cosine_distance(?1, ?2)",
                rusqlite::params![encode(&[1.0, 0.0]), encode(&[-1.0, 0.0])],
                |r| r.get(0),
            )
            .unwrap();
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_distance_sql_function_rejects_mismatched_blobs() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        let result: rusqlite::Result<f64> = conn.query_row(
            "SELECT cosine_distance(?1, ?2)",
            rusqlite::params![encode(&[1.0, 0.0]), encode(&[1.0])],
            |r| r.get(0),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_creates_root_and_caches_handle() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("nested").join("vectors");
        let manager = ConnectionManager::new(StoreConfig::new(&root));
        assert!(!manager.is_connected());

        let first = manager.get().await.unwrap();
        assert!(root.join(crate::config::DB_FILE).exists());
        let second = manager.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_cold_start_shares_one_handle() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(ConnectionManager::new(StoreConfig::new(dir.path().join("v"))));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&manager);
                tokio::spawn(async move { m.get().await.unwrap() })
            })
            .collect();
        let mut handles = Vec::new();
        for t in tasks {
            handles.push(t.await.unwrap());
        }
        assert!(handles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_unusable_root_is_store_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let manager = ConnectionManager::new(StoreConfig::new(blocker.join("vectors")));

        match manager.get().await {
            Err(VectorStoreError::StoreUnavailable { path, .. }) => {
                assert_eq!(path, blocker.join("vectors"));
            }
            other => panic!("expected StoreUnavailable, got {:?}", other.map(|_| ())),
        }
        assert!(!manager.is_connected());
    }
}
