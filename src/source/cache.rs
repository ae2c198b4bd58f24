//! SQLite store of the last successfully parsed manifest per location
//!
//! Serves as the offline fallback when the manifest server is unreachable.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::version::error::CacheError;

/// A manifest body read back from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedManifest {
    pub body: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

pub struct ManifestCache {
    conn: Mutex<Connection>,
}

impl ManifestCache {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing manifest cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
        };

        cache.create_schema()?;
        Ok(cache)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS manifests (
                location TEXT PRIMARY KEY,
                body BLOB NOT NULL,
                fetched_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        debug!("Manifest cache schema ready");
        Ok(())
    }

    /// Replace the cached manifest for `location`
    pub fn store(&self, location: &str, body: &[u8]) -> Result<(), CacheError> {
        self.store_at(location, body, Utc::now())
    }

    fn store_at(
        &self,
        location: &str,
        body: &[u8],
        fetched_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO manifests (location, body, fetched_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(location) DO UPDATE SET body = excluded.body, fetched_at = excluded.fetched_at
            "#,
            (location, body, fetched_at.timestamp_millis()),
        )?;

        debug!("Cached {} manifest bytes for {}", body.len(), location);
        Ok(())
    }

    /// Read the cached manifest for `location`, if any
    pub fn load(&self, location: &str) -> Result<Option<CachedManifest>, CacheError> {
        let conn = self.lock_conn()?;

        let row: Option<(Vec<u8>, i64)> = conn
            .query_row(
                "SELECT body, fetched_at FROM manifests WHERE location = ?1",
                [location],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(body, fetched_at)| CachedManifest {
            body,
            fetched_at: DateTime::from_timestamp_millis(fetched_at).unwrap_or_default(),
        }))
    }
}
