//! cache_get tool implementation.
//!
//! Looks up the cached record for a URL without extracting anything.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webground_client::canonicalize;
use webground_core::{ContentCache, Error, ExtractionResult};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The URL whose cached record to return.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// The cached record.
    pub record: ExtractionResult,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &ContentCache, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let url = canonicalize(&params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let record = cache
        .get(url.as_str())
        .await?
        .ok_or_else(|| Error::CacheMiss(url.to_string()))?;

    let output = CacheGetOutput { record };
    let json = serde_json::to_string_pretty(&output).map_err(Error::from)?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
