//! Key-value store abstraction backing the content cache.
//!
//! Any store with string values, per-key TTL, and atomic per-key get/set
//! satisfies the contract. [`CacheDb`] is the persistent implementation.

use super::connection::CacheDb;
use crate::Error;
use crate::clock::expiry_after;
use std::time::Duration;
use tokio_rusqlite::{params, rusqlite};

/// String key-value store with TTL support.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Get a live value. Expired entries are reported as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Insert or replace a value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl KvStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = self.clock.now_millis();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE key = ?1 AND expires_at > ?2")?;

                match stmt.query_row(params![key, now], |row| row.get(0)) {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let stored_at = self.clock.now_millis();
        let expires_at = expiry_after(stored_at, ttl);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_entries (key, value, stored_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        stored_at = excluded.stored_at,
                        expires_at = excluded.expires_at",
                    params![key, value, stored_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = self.clock.now_millis();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM kv_entries WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge oldest entries until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_oldest(&self, max_entries: usize) -> Result<u64, Error> {
        let max = max_entries as i64;
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM kv_entries WHERE key IN (
                    SELECT key FROM kv_entries ORDER BY stored_at ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries, expired or not.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
