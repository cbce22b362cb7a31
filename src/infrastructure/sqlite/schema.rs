use crate::config::CATALOG_TABLE;
use crate::domain::values::distance::DistanceMetric;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Columns of a collection table, in the order row readers expect them.
pub const RECORD_COLS: &str = "id, file_path, element_type, name, start_line, end_line, content, vector";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub dimension: usize,
    pub metric: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// SQLite resolves table names case-insensitively, so the lookup does too.
pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![name],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Creates the collection table and records its schema in the catalog.
///
/// Fails with "already exists" if another writer created the table first;
/// see [`is_already_exists`].
pub fn create_collection(
    conn: &Connection,
    name: &str,
    dimension: usize,
    metric: DistanceMetric,
) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE \"{name}\" (
            id TEXT PRIMARY KEY,
            file_path TEXT NOT NULL,
            element_type TEXT NOT NULL,
            name TEXT NOT NULL,
            start_line INTEGER NOT NULL,
            end_line INTEGER NOT NULL,
            content TEXT NOT NULL,
            vector BLOB NOT NULL
        );

        CREATE INDEX IF NOT EXISTS \"idx_{name}_element_type\" ON \"{name}\"(element_type);

        CREATE TABLE IF NOT EXISTS {CATALOG_TABLE} (
            name TEXT PRIMARY KEY COLLATE NOCASE,
            dimension INTEGER NOT NULL,
            metric TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "
    ))?;
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {CATALOG_TABLE} (name, dimension, metric, created_at) VALUES (?1, ?2, ?3, ?4)"
        ),
        params![name, dimension as i64, metric.to_string(), Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn drop_collection(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{name}\";"))?;
    if table_exists(conn, CATALOG_TABLE)? {
        conn.execute(
            &format!("DELETE FROM {CATALOG_TABLE} WHERE name = ?1 COLLATE NOCASE"),
            params![name],
        )?;
    }
    Ok(())
}

pub fn catalog_entry(conn: &Connection, name: &str) -> rusqlite::Result<Option<CatalogEntry>> {
    if !table_exists(conn, CATALOG_TABLE)? {
        return Ok(None);
    }
    conn.query_row(
        &format!("SELECT dimension, metric, created_at FROM {CATALOG_TABLE} WHERE name = ?1 COLLATE NOCASE"),
        params![name],
        |row| {
            let dimension: i64 = row.get(0)?;
            let created_str: String = row.get(2)?;
            Ok(CatalogEntry {
                dimension: dimension as usize,
                metric: row.get(1)?,
                created_at: DateTime::parse_from_rfc3339(&created_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok(),
            })
        },
    )
    .optional()
}

pub fn count_rows(conn: &Connection, name: &str) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM \"{name}\""), [], |r| r.get(0))?;
    Ok(count as u64)
}

/// True when `err` is SQLite refusing to create a table that is already there.
/// Prepare-time failures surface as `SqlInputError`, step-time ones as
/// `SqliteFailure`; both carry the same message.
pub fn is_already_exists(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqlInputError { msg, .. } => msg.contains("already exists"),
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.contains("already exists"),
        _ => false,
    }
}
