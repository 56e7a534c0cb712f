// src/repositories/local_store.rs
//
// Durable local store - the whole collection as one JSON blob under one key
//
// The contract is infallible for callers: an unreadable blob
// reads as an empty collection and a rejected write is only logged.

use chrono::Utc;
use log::{debug, error, warn};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::MediaRecord;
use crate::error::AppResult;

/// Key the collection blob is stored under
pub const DEFAULT_STORAGE_KEY: &str = "animanga_data_backup";

pub trait LocalStore: Send + Sync {
    /// Persisted collection, or empty when nothing is stored or the blob is corrupt
    fn read_all(&self) -> Vec<MediaRecord>;

    /// Replace the persisted collection (best effort)
    fn write_all(&self, records: &[MediaRecord]);
}

pub struct SqliteLocalStore {
    pool: Arc<ConnectionPool>,
    key: String,
}

impl SqliteLocalStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self::with_key(pool, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(pool: Arc<ConnectionPool>, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    fn read_blob(&self) -> AppResult<Option<String>> {
        let conn = get_connection(&self.pool)?;

        let blob = conn
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1",
                params![self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(blob)
    }

    fn try_read_all(&self) -> AppResult<Vec<MediaRecord>> {
        match self.read_blob()? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_write_all(&self, records: &[MediaRecord]) -> AppResult<()> {
        let blob = serde_json::to_string(records)?;
        let conn = get_connection(&self.pool)?;

        conn.execute(
            "INSERT OR REPLACE INTO local_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![self.key, blob, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}

impl LocalStore for SqliteLocalStore {
    fn read_all(&self) -> Vec<MediaRecord> {
        match self.try_read_all() {
            Ok(records) => {
                debug!("Local store '{}' read {} records", self.key, records.len());
                records
            }
            Err(e) => {
                warn!(
                    "Local store '{}' is unreadable, treating as empty: {}",
                    self.key, e
                );
                Vec::new()
            }
        }
    }

    fn write_all(&self, records: &[MediaRecord]) {
        if let Err(e) = self.try_write_all(records) {
            error!("Local store '{}' rejected write: {}", self.key, e);
        } else {
            debug!("Local store '{}' wrote {} records", self.key, records.len());
        }
    }
}
