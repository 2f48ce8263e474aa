//! web_retrieve tool implementation.
//!
//! Retrieves one URL through the cache-aside pipeline.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webground_client::{Retriever, canonicalize};
use webground_core::{Error, ExtractionResult};

/// Input parameters for web_retrieve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebRetrieveParams {
    /// The URL to retrieve.
    pub url: String,

    /// Drop any cached record first and extract again.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for web_retrieve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebRetrieveOutput {
    /// "static" or "dynamic".
    pub strategy: String,
    /// Whether the record was served from cache.
    pub from_cache: bool,
    pub result: ExtractionResult,
}

/// Implementation of the web_retrieve tool.
///
/// Extraction failures are reported inside `result.error`, not as tool errors.
pub async fn retrieve_impl(retriever: &Retriever, params: WebRetrieveParams) -> Result<CallToolResult, McpError> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url must not be empty".into()).into());
    }

    let canonical = canonicalize(url).ok();

    if params.force_refresh
        && let Some(canonical) = &canonical
    {
        retriever.cache().invalidate(canonical.as_str()).await?;
    }

    let strategy = retriever
        .strategy_for(canonical.as_ref().map_or(url, |u| u.as_str()))
        .as_str()
        .to_string();
    let result = retriever.retrieve(url).await;
    let output = WebRetrieveOutput { strategy, from_cache: result.cached_at.is_some(), result };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).map_err(Error::from)?,
    )]))
}
