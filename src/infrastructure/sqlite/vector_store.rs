use crate::config::StoreConfig;
use crate::domain::entities::vector_record::{
    check_batch, check_vector, ChunkPayload, SearchResult, VectorRecord,
};
use crate::domain::error::{StorageFault, VectorStoreError};
use crate::domain::ports::vector_store::{CollectionInfo, SearchFilter, VectorStore};
use crate::domain::values::distance::{distance_to_score, DistanceMetric};
use crate::infrastructure::sqlite::codec;
use crate::infrastructure::sqlite::connection::ConnectionManager;
use crate::infrastructure::sqlite::schema::{self, RECORD_COLS};
use rusqlite::{params, Connection, TransactionBehavior};

/// SQLite-backed collection of code-chunk vectors.
///
/// The collection table is created by the first batch written to it and
/// dropped wholesale by [`VectorStore::clear`]. All statements run on a
/// blocking thread against the single shared connection.
pub struct SqliteVectorStore {
    connections: ConnectionManager,
}

impl SqliteVectorStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            connections: ConnectionManager::new(config),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        self.connections.config()
    }

    fn collection(&self) -> String {
        self.config().collection.clone()
    }

    /// Runs `f` on the shared connection. The outer error means the store
    /// could not be reached at all; the inner one is the operation's fault.
    async fn with_connection<T, F>(&self, f: F) -> Result<Result<T, StorageFault>, VectorStoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageFault> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connections.get().await?;
        let outcome = tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StorageFault::Poisoned(e.to_string()))?;
            f(&mut *guard)
        })
        .await;
        Ok(outcome.map_err(StorageFault::from).and_then(|r| r))
    }
}

#[async_trait::async_trait]
impl VectorStore for SqliteVectorStore {
    fn dimension(&self) -> usize {
        self.config().dimension
    }

    fn collection_name(&self) -> &str {
        &self.config().collection
    }

    async fn connect(&self) -> Result<(), VectorStoreError> {
        self.connections.get().await.map(|_| ())
    }

    async fn collection_exists(&self) -> bool {
        let name = self.collection();
        match self
            .with_connection(move |conn| Ok(schema::table_exists(conn, &name)?))
            .await
        {
            Ok(Ok(exists)) => exists,
            Ok(Err(e)) => {
                tracing::debug!("Existence probe failed, treating as absent: {e}");
                false
            }
            Err(e) => {
                tracing::debug!("Store unreachable, treating collection as absent: {e}");
                false
            }
        }
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }
        check_batch(records, self.dimension())?;

        let count = records.len();
        let collection = self.collection();
        let dimension = self.dimension();
        let metric = self.config().metric;
        let batch = records.to_vec();
        let name = collection.clone();

        self.with_connection(move |conn| write_batch(conn, &name, dimension, metric, &batch))
            .await?
            .map_err(|fault| match fault {
                StorageFault::DimensionConflict { expected, actual } => {
                    VectorStoreError::DimensionMismatch { expected, actual }
                }
                source => VectorStoreError::UpsertFailed {
                    count,
                    collection,
                    source,
                },
            })?;

        tracing::debug!("Upserted {count} records");
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        check_vector(query, self.dimension())?;

        let collection = self.collection();
        let name = collection.clone();
        let query = query.to_vec();
        let filter = filter.clone();

        self.with_connection(move |conn| nearest(conn, &name, &query, &filter, limit))
            .await?
            .map_err(|fault| match fault {
                StorageFault::DimensionConflict { expected, actual } => {
                    VectorStoreError::DimensionMismatch { expected, actual }
                }
                source => VectorStoreError::SearchFailed { collection, source },
            })
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        let collection = self.collection();
        let name = collection.clone();
        let dropped = self
            .with_connection(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                if !schema::table_exists(&tx, &name)? {
                    return Ok(false);
                }
                schema::drop_collection(&tx, &name)?;
                tx.commit()?;
                Ok(true)
            })
            .await?
            .map_err(|source| VectorStoreError::ClearFailed {
                collection: collection.clone(),
                source,
            })?;

        if dropped {
            tracing::info!("Dropped collection \"{collection}\"");
        }
        Ok(())
    }

    async fn collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError> {
        let collection = self.collection();
        let name = collection.clone();
        let fallback_dimension = self.dimension();
        let fallback_metric = self.config().metric.to_string();

        self.with_connection(move |conn| {
            if !schema::table_exists(conn, &name)? {
                return Ok(None);
            }
            let record_count = schema::count_rows(conn, &name)?;
            let entry = schema::catalog_entry(conn, &name)?;
            Ok(Some(CollectionInfo {
                record_count,
                vector_size: entry.as_ref().map_or(fallback_dimension, |e| e.dimension),
                distance_metric: entry
                    .as_ref()
                    .map_or(fallback_metric, |e| e.metric.clone()),
                created_at: entry.and_then(|e| e.created_at),
                name,
            }))
        })
        .await?
        .map_err(|source| VectorStoreError::SearchFailed { collection, source })
    }
}

/// Applies one batch as a single immediate transaction: create the collection
/// if absent, check the batch against the recorded dimension, then merge by id.
fn write_batch(
    conn: &mut Connection,
    collection: &str,
    dimension: usize,
    metric: DistanceMetric,
    records: &[VectorRecord],
) -> Result<(), StorageFault> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !schema::table_exists(&tx, collection)? {
        match schema::create_collection(&tx, collection, dimension, metric) {
            Ok(()) => tracing::info!("Created collection \"{collection}\" ({dimension}-d, {metric})"),
            Err(e) if schema::is_already_exists(&e) => {
                tracing::warn!("Collection \"{collection}\" appeared concurrently, merging instead");
            }
            Err(e) => return Err(e.into()),
        }
    }

    // First writer fixed the width; later batches must agree with it.
    let expected = schema::catalog_entry(&tx, collection)?
        .map_or(dimension, |entry| entry.dimension);
    if let Some(bad) = records.iter().find(|r| r.vector.len() != expected) {
        return Err(StorageFault::DimensionConflict {
            expected,
            actual: bad.vector.len(),
        });
    }

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{collection}\" ({RECORD_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                file_path = excluded.file_path,
                element_type = excluded.element_type,
                name = excluded.name,
                start_line = excluded.start_line,
                end_line = excluded.end_line,
                content = excluded.content,
                vector = excluded.vector"
        ))?;
        for record in records {
            let p = &record.payload;
            stmt.execute(params![
                record.id,
                p.file_path,
                p.element_type,
                p.name,
                p.start_line,
                p.end_line,
                p.content,
                codec::encode(&record.vector),
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

struct RawRow {
    id: String,
    payload: ChunkPayload,
    vector: Vec<u8>,
    distance: f64,
}

fn row_to_raw(row: &rusqlite::Row) -> Result<RawRow, rusqlite::Error> {
    Ok(RawRow {
        id: row.get(0)?,
        payload: ChunkPayload {
            file_path: row.get(1)?,
            element_type: row.get(2)?,
            name: row.get(3)?,
            start_line: row.get(4)?,
            end_line: row.get(5)?,
            content: row.get(6)?,
        },
        vector: row.get(7)?,
        distance: row.get(8)?,
    })
}

/// Top-`limit` rows by ascending cosine distance, ties in insertion order.
/// The type predicate, ordering and limit all run inside SQLite.
fn nearest(
    conn: &Connection,
    collection: &str,
    query: &[f32],
    filter: &SearchFilter,
    limit: usize,
) -> Result<Vec<SearchResult>, StorageFault> {
    if !schema::table_exists(conn, collection)? {
        return Ok(vec![]);
    }
    if let Some(entry) = schema::catalog_entry(conn, collection)? {
        if entry.dimension != query.len() {
            return Err(StorageFault::DimensionConflict {
                expected: entry.dimension,
                actual: query.len(),
            });
        }
    }

    let blob = codec::encode(query);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut sql = format!(
        "SELECT {RECORD_COLS}, cosine_distance(vector, ?1) AS distance FROM \"{collection}\""
    );
    if filter.element_type.is_some() {
        sql.push_str(" WHERE element_type = ?3");
    }
    sql.push_str(" ORDER BY distance ASC, rowid ASC LIMIT ?2");

    let mut stmt = conn.prepare(&sql)?;
    let rows: Vec<RawRow> = match &filter.element_type {
        Some(element_type) => stmt
            .query_map(params![blob, limit, element_type], row_to_raw)?
            .collect::<rusqlite::Result<_>>()?,
        None => stmt
            .query_map(params![blob, limit], row_to_raw)?
            .collect::<rusqlite::Result<_>>()?,
    };

    rows.into_iter()
        .map(|raw| {
            let vector = codec::decode(&raw.vector)
                .map_err(|e| StorageFault::Corrupt(format!("record \"{}\": {e}", raw.id)))?;
            Ok(SearchResult {
                score: distance_to_score(raw.distance),
                record: VectorRecord {
                    id: raw.id,
                    vector,
                    payload: raw.payload,
                },
            })
        })
        .collect()
}
