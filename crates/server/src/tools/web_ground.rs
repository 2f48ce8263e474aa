//! web_ground tool implementation.
//!
//! Gathers sources for a chat message: the URL it mentions, or a web search.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use webground_client::Grounder;
use webground_core::Error;

/// Input parameters for web_ground tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebGroundParams {
    /// The user's message, possibly containing a URL.
    pub message: String,
}

/// Implementation of the web_ground tool.
pub async fn ground_impl(grounder: &Grounder, params: WebGroundParams) -> Result<CallToolResult, McpError> {
    if params.message.trim().is_empty() {
        return Err(Error::InvalidInput("message must not be empty".into()).into());
    }

    let grounding = grounder.ground(&params.message).await;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&grounding).map_err(Error::from)?,
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::state;

    #[tokio::test]
    async fn test_ground_empty_message() {
        let state = state().await;
        let params = WebGroundParams { message: "\n".into() };
        assert!(ground_impl(&state.grounder, params).await.is_err());
    }

    #[tokio::test]
    async fn test_ground_url_message() {
        let state = state().await;
        let params = WebGroundParams { message: "what is at http://127.0.0.1:1/ today".into() };

        let result = ground_impl(&state.grounder, params).await.unwrap();
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text).unwrap();

        assert_eq!(value["url"], "http://127.0.0.1:1/");
        assert_eq!(value["query"], "what is at today");
        assert_eq!(value["sources"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ground_without_search_has_no_sources() {
        let state = state().await;
        let params = WebGroundParams { message: "explain borrow checking".into() };

        let result = ground_impl(&state.grounder, params).await.unwrap();
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text).unwrap();

        assert!(value["url"].is_null());
        assert!(value["sources"].as_array().unwrap().is_empty());
    }
}
