//! SQLite Interaction Storage
//!
//! Information Hiding:
//! - Table layout and SQL hidden behind the storage trait
//! - Connection is guarded by an async mutex so writes are serialized
//! - Timestamp text format handled here, callers only see `DateTime<Utc>`

use super::{InteractionRecord, InteractionStore};
use crate::error::{ensure_non_empty, Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS interactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    );
"#;

// Never stamp a row earlier than the newest one already stored
const INSERT: &str = r#"
    INSERT INTO interactions (question, answer, timestamp)
    VALUES (
        ?1,
        ?2,
        MAX(CURRENT_TIMESTAMP, COALESCE((SELECT MAX(timestamp) FROM interactions), CURRENT_TIMESTAMP))
    )
"#;

const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite-backed interaction log
/// One table, one row per exchange
pub struct SqliteInteractionStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteInteractionStore {
    /// Open (or create) the database file at `path`
    ///
    /// The schema is not touched until [`InteractionStore::initialize`].
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::StorageUnavailable(format!("cannot create {:?}: {}", parent, e))
            })?;
        }

        let conn = Connection::open(&path)
            .map_err(|e| Error::StorageUnavailable(format!("cannot open {:?}: {}", path, e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        tracing::debug!("[SqliteInteractionStore] Opened database at {:?}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::StorageRead(format!("bad timestamp '{}': {}", raw, e)))
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::StorageUnavailable(format!("cannot create schema: {}", e)))?;
        tracing::info!("[SqliteInteractionStore] Schema ready at {:?}", self.path);
        Ok(())
    }

    async fn append(&self, question: &str, answer: &str) -> Result<i64> {
        ensure_non_empty("question", question)?;
        ensure_non_empty("answer", answer)?;

        let conn = self.conn.lock().await;
        conn.execute(INSERT, params![question, answer])
            .map_err(|e| Error::StorageWrite(e.to_string()))?;
        let id = conn.last_insert_rowid();

        tracing::debug!("[SqliteInteractionStore] Appended interaction {}", id);
        Ok(id)
    }

    async fn all(&self) -> Result<Vec<InteractionRecord>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare("SELECT id, question, answer, timestamp FROM interactions ORDER BY id ASC")
            .map_err(|e| Error::StorageRead(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| Error::StorageRead(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, question, answer, raw_ts) = row.map_err(|e| Error::StorageRead(e.to_string()))?;
            records.push(InteractionRecord {
                id,
                question,
                answer,
                timestamp: parse_timestamp(&raw_ts)?,
            });
        }

        tracing::debug!("[SqliteInteractionStore] Loaded {} interactions", records.len());
        Ok(records)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))
            .map_err(|e| Error::StorageRead(e.to_string()))?;
        Ok(count as usize)
    }
}
