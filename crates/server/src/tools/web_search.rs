//! web_search tool implementation.
//!
//! Renders a web search and retrieves the top results.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webground_client::SearchFallback;
use webground_core::{Error, ExtractionResult};

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Free-text search query.
    pub query: String,
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    pub query: String,
    /// Successfully retrieved results, in search rank order.
    pub results: Vec<ExtractionResult>,
}

/// Implementation of the web_search tool.
pub async fn search_impl(search: Option<&SearchFallback>, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput("query must not be empty".into()).into());
    }

    let search = search.ok_or(Error::RenderDisabled)?;
    let results = search.search_and_retrieve(query).await;
    let output = WebSearchOutput { query: query.to_string(), results };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).map_err(Error::from)?,
    )]))
}
