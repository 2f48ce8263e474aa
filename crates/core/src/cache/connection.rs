//! SQLite handle for the cache: open, pragmas, schema upgrades.
//!
//! The schema version lives in `PRAGMA user_version`; each batch in
//! [`SCHEMA`] moves it up by one inside its own transaction.

use crate::Error;
use crate::clock::{Clock, SystemClock};
use std::path::Path;
use std::sync::Arc;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Schema batches in order. Batch `i` leaves `user_version` at `i + 1`.
const SCHEMA: &[&str] = &[include_str!("../../migrations/001_kv_entries.sql")];

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Expiry is evaluated against `clock`.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
    pub(crate) clock: Arc<dyn Clock>,
}

impl CacheDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Replace the clock used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        upgrade_schema(&conn).await?;

        Ok(Self { conn, clock: Arc::new(SystemClock) })
    }
}

async fn upgrade_schema(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        for (idx, sql) in SCHEMA.iter().enumerate().skip(version.max(0) as usize) {
            let target = idx + 1;
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .and_then(|_| tx.execute_batch(&format!("PRAGMA user_version = {target}")))
                .map_err(|e| Error::MigrationFailed(format!("schema {target}: {e}")))?;
            tx.commit()?;
            tracing::debug!(version = target, "cache schema upgraded");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    async fn user_version(db: &CacheDb) -> i64 {
        db.conn
            .call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_reaches_latest_version() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert_eq!(user_version(&db).await, SCHEMA.len() as i64);

        let has_table: bool = db
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='kv_entries')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert!(has_table);
    }

    #[tokio::test]
    async fn test_reopen_keeps_entries() {
        let dir = std::env::temp_dir().join(format!("webground-schema-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cache.db");
        let _ = std::fs::remove_file(&path);

        let db = CacheDb::open(&path).await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO kv_entries (key, value, stored_at, expires_at) VALUES ('k', 'v', 0, 1)",
                    [],
                )
            })
            .await
            .unwrap();
        drop(db);

        let reopened = CacheDb::open(&path).await.unwrap();
        assert_eq!(user_version(&reopened).await, SCHEMA.len() as i64);
        let count: i64 = reopened
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 1);

        drop(reopened);
        std::fs::remove_dir_all(&dir).ok();
    }
}
