//! Content cache: URL → [`ExtractionResult`] over any [`KvStore`].
//!
//! Reads validate the stored record and delete anything malformed, reporting
//! a miss instead. Writes stamp `cachedAt`, enforce a serialized-size cap, and
//! use a fixed TTL, so entries expire without an eviction pass.

use super::key::cache_key;
use super::store::KvStore;
use crate::clock::{Clock, SystemClock, expiry_after};
use crate::record::ExtractionResult;
use crate::{AppConfig, Error};
use std::sync::Arc;
use std::time::Duration;

/// Default entry lifetime: 7 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default maximum serialized entry size: 1 MiB.
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 1_048_576;

/// Default content cap in characters.
pub const DEFAULT_CONTENT_CAP: usize = 10_000;

/// Cache policy.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entry_bytes: usize,
    /// Used when validating stored records.
    pub content_cap: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES, content_cap: DEFAULT_CONTENT_CAP }
    }
}

impl From<&AppConfig> for CacheConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            ttl: config.cache_ttl(),
            max_entry_bytes: config.max_cache_entry_bytes,
            content_cap: config.content_cap,
        }
    }
}

/// Outcome of a cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Stored { bytes: usize },
    /// Serialized record exceeded the size cap; nothing was written.
    Rejected { bytes: usize },
}

/// Cache-aside store for extraction results.
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ContentCache {
    pub fn new(store: Arc<dyn KvStore>, config: CacheConfig) -> Self {
        Self { store, clock: Arc::new(SystemClock), config }
    }

    /// Replace the clock used for `cachedAt` stamps and freshness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up the record for `url`.
    ///
    /// Returns `Ok(None)` on a miss, on expiry, and after deleting a corrupt
    /// entry. Only backing-store failures surface as `Err`.
    pub async fn get(&self, url: &str) -> Result<Option<ExtractionResult>, Error> {
        let key = cache_key(url);
        let Some(raw) = self.store.get(&key).await? else {
            tracing::debug!(%url, "cache miss");
            return Ok(None);
        };

        let record = match self.decode(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(%url, error = %e, "discarding corrupt cache entry");
                self.store.delete(&key).await?;
                return Ok(None);
            }
        };

        if let Some(cached_at) = record.cached_at {
            let expires_at = expiry_after(cached_at, self.config.ttl);
            if self.clock.now_millis() >= expires_at {
                tracing::debug!(%url, "cache entry past ttl");
                return Ok(None);
            }
        }

        tracing::debug!(%url, "cache hit");
        Ok(Some(record))
    }

    /// Store `result` under `url`.
    ///
    /// Oversized records are not written; the caller still owns the result.
    pub async fn set(&self, url: &str, result: &ExtractionResult) -> Result<CacheWrite, Error> {
        let mut record = result.clone();
        record.cached_at = Some(self.clock.now_millis());
        record
            .validate(self.config.content_cap)
            .map_err(|reason| Error::InvalidInput(format!("refusing to cache malformed record: {reason}")))?;

        let payload = serde_json::to_string(&record)?;
        let bytes = payload.len();
        if bytes > self.config.max_entry_bytes {
            tracing::warn!(%url, bytes, limit = self.config.max_entry_bytes, "record too large to cache");
            return Ok(CacheWrite::Rejected { bytes });
        }

        self.store
            .set_with_ttl(&cache_key(url), &payload, self.config.ttl)
            .await?;
        tracing::debug!(%url, bytes, "cached record");
        Ok(CacheWrite::Stored { bytes })
    }

    /// Drop the entry for `url`, if any.
    pub async fn invalidate(&self, url: &str) -> Result<(), Error> {
        self.store.delete(&cache_key(url)).await
    }

    fn decode(&self, raw: &str) -> Result<ExtractionResult, Error> {
        let record: ExtractionResult =
            serde_json::from_str(raw).map_err(|e| Error::CacheCorrupt(e.to_string()))?;
        record.validate(self.config.content_cap).map_err(Error::CacheCorrupt)?;
        if record.cached_at.is_none() {
            return Err(Error::CacheCorrupt("missing cachedAt".into()));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDb, MemoryStore};
    use crate::clock::ManualClock;
    use crate::record::Headings;

    const START: i64 = 1_700_000_000_000;

    fn record(url: &str, content: &str) -> ExtractionResult {
        ExtractionResult {
            url: url.into(),
            title: "Title".into(),
            headings: Headings { h1: "Heading".into(), h2: "Sub".into() },
            meta_description: "Description".into(),
            content: content.into(),
            error: None,
            cached_at: None,
        }
    }

    fn memory_cache(config: CacheConfig) -> (ContentCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(START));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let cache = ContentCache::new(store.clone(), config).with_clock(clock.clone());
        (cache, store, clock)
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let (cache, _, clock) = memory_cache(CacheConfig::default());
        let url = "https://example.com/article";
        let original = record(url, "Body text.");

        let write = cache.set(url, &original).await.unwrap();
        assert!(matches!(write, CacheWrite::Stored { .. }));

        let cached = cache.get(url).await.unwrap().unwrap();
        assert!(cached.cached_at.unwrap() >= START);
        assert!(cached.cached_at.unwrap() <= clock.now_millis());
        assert_eq!(ExtractionResult { cached_at: None, ..cached }, original);
    }

    #[tokio::test]
    async fn test_oversized_record_is_not_stored() {
        let config = CacheConfig { max_entry_bytes: 256, ..Default::default() };
        let (cache, store, _) = memory_cache(config);
        let url = "https://example.com/big";

        let write = cache.set(url, &record(url, &"x".repeat(500))).await.unwrap();
        assert!(matches!(write, CacheWrite::Rejected { bytes } if bytes > 256));
        assert!(cache.get(url).await.unwrap().is_none());
        assert_eq!(store.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, _, clock) = memory_cache(CacheConfig::default());
        let url = "https://example.com/";
        cache.set(url, &record(url, "fresh")).await.unwrap();

        clock.advance(DEFAULT_TTL - Duration::from_millis(1));
        assert!(cache.get(url).await.unwrap().is_some());

        clock.advance(Duration::from_millis(2));
        assert!(cache.get(url).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_still_hits() {
        let config = CacheConfig { ttl: Duration::from_secs(10_000_000_000_000_000), ..Default::default() };
        let (cache, _, clock) = memory_cache(config);
        let url = "https://example.com/forever";
        cache.set(url, &record(url, "kept")).await.unwrap();

        clock.advance(DEFAULT_TTL * 52);
        assert!(cache.get(url).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_deleted() {
        let (cache, store, _) = memory_cache(CacheConfig::default());
        let url = "https://example.com/corrupt";
        store
            .insert_raw(&cache_key(url), r#"{"unexpected":"shape"}"#, DEFAULT_TTL)
            .await;

        assert!(cache.get(url).await.unwrap().is_none());
        assert!(store.peek(&cache_key(url)).await.is_none());
    }

    #[tokio::test]
    async fn test_entry_without_stamp_is_corrupt() {
        let (cache, store, _) = memory_cache(CacheConfig::default());
        let url = "https://example.com/unstamped";
        let payload = serde_json::to_string(&record(url, "body")).unwrap();
        store.insert_raw(&cache_key(url), &payload, DEFAULT_TTL).await;

        assert!(cache.get(url).await.unwrap().is_none());
        assert!(store.peek(&cache_key(url)).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_refused() {
        let (cache, _, _) = memory_cache(CacheConfig::default());
        let result = cache.set("https://example.com/", &record("", "body")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_error_records_roundtrip() {
        let (cache, _, _) = memory_cache(CacheConfig::default());
        let url = "https://unreachable.invalid/";
        let failure = ExtractionResult::failure(url, "HTTP_ERROR: network error");

        cache.set(url, &failure).await.unwrap();
        let cached = cache.get(url).await.unwrap().unwrap();
        assert_eq!(cached.error, failure.error);
    }

    #[tokio::test]
    async fn test_sqlite_backed_roundtrip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let cache = ContentCache::new(Arc::new(db), CacheConfig::default());
        let url = "https://example.com/sqlite";

        cache.set(url, &record(url, "persisted")).await.unwrap();
        let cached = cache.get(url).await.unwrap().unwrap();
        assert_eq!(cached.content, "persisted");

        cache.invalidate(url).await.unwrap();
        assert!(cache.get(url).await.unwrap().is_none());
    }
}
