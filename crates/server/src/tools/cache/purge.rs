//! cache_purge tool implementation.
//!
//! Purges cache entries by expiry or count.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webground_core::{CacheDb, Error};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Delete entries past their TTL.
    #[serde(default)]
    pub expired: bool,

    /// Keep only the newest N entries.
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Entries left afterwards.
    pub remaining: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if !params.expired && params.max_entries.is_none() {
        return Err(Error::InvalidInput("At least one of expired or max_entries must be specified".to_string()).into());
    }

    let mut deleted_total = 0u64;

    if params.expired {
        deleted_total += cache.purge_expired().await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += cache.purge_oldest(max_entries).await?;
    }

    let remaining = cache.entry_count().await?;
    tracing::info!(deleted = deleted_total, remaining, "cache purged");

    let output = CachePurgeOutput { deleted: deleted_total, remaining };
    let json = serde_json::to_string_pretty(&output).map_err(Error::from)?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use webground_core::KvStore;

    fn output(result: &CallToolResult) -> CachePurgeOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_purge_requires_a_criterion() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let params = CachePurgeParams { expired: false, max_entries: None };
        assert!(purge_impl(&cache, params).await.is_err());
    }

    #[tokio::test]
    async fn test_purge_max_entries() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        for i in 0..5 {
            cache
                .set_with_ttl(&format!("scrape:https://example.com/{i}"), "{}", Duration::from_secs(60))
                .await
                .unwrap();
        }

        let params = CachePurgeParams { expired: false, max_entries: Some(2) };
        let out = output(&purge_impl(&cache, params).await.unwrap());

        assert_eq!(out.deleted, 3);
        assert_eq!(out.remaining, 2);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache
            .set_with_ttl("scrape:https://example.com/", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        let params = CachePurgeParams { expired: true, max_entries: None };
        let out = output(&purge_impl(&cache, params).await.unwrap());

        assert_eq!(out.deleted, 0);
        assert_eq!(out.remaining, 1);
    }
}
