//! In-process [`KvStore`] with clock-driven expiry.

use super::store::KvStore;
use crate::Error;
use crate::clock::{Clock, SystemClock, expiry_after};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: i64,
}

/// In-memory store, mainly for tests and single-process embedding.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), clock }
    }

    /// Plant a raw value under `key`, bypassing record validation.
    pub async fn insert_raw(&self, key: &str, value: &str, ttl: Duration) {
        let _ = self.set_with_ttl(key, value, ttl).await;
    }

    /// Raw value for `key` regardless of shape, if still live.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.get(key).await.ok().flatten()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let now = self.clock.now_millis();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired: drop it lazily
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let expires_at = expiry_after(self.clock.now_millis(), ttl);
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value: value.to_string(), expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
