//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::AppState;
use crate::tools::{
    WebGroundParams, WebRetrieveParams, WebSearchParams,
    cache::{CacheGetParams, CachePurgeParams, get_impl, purge_impl},
    web_ground::ground_impl,
    web_retrieve::retrieve_impl,
    web_search::search_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-web-ground.
#[derive(Clone)]
pub struct McpWebServer {
    tool_router: ToolRouter<Self>,
    state: AppState,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpWebServer {
    /// Create a new server handler.
    pub fn new(state: AppState) -> Self {
        Self { tool_router: Self::tool_router(), state }
    }

    #[tool(
        description = "Retrieve a web page as structured fields (title, h1/h2 headings, meta description, bounded plain-text content). Uses a 7-day cache; script-heavy sites are rendered in a headless browser. Failures are reported in result.error."
    )]
    async fn web_retrieve(&self, params: Parameters<WebRetrieveParams>) -> Result<CallToolResult, McpError> {
        retrieve_impl(&self.state.retriever, params.0).await
    }

    #[tool(
        description = "Search the web for a query and retrieve the top results. Only successfully retrieved pages are returned; an empty list means nothing usable was found."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(self.state.search.as_ref(), params.0).await
    }

    #[tool(
        description = "Gather sources for a chat message. If the message contains a URL, that page is retrieved and the query is the message without it; otherwise the message is searched."
    )]
    async fn web_ground(&self, params: Parameters<WebGroundParams>) -> Result<CallToolResult, McpError> {
        ground_impl(&self.state.grounder, params.0).await
    }

    #[tool(description = "Return the cached record for a URL without fetching it.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.state.retriever.cache(), params.0).await
    }

    #[tool(description = "Purge cache entries: expired ones, and/or all but the newest max_entries.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.state.db, params.0).await
    }
}

impl ServerHandler for McpWebServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-web-ground".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::state;

    #[tokio::test]
    async fn test_all_tools_registered() {
        let server = McpWebServer::new(state().await);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cache_get", "cache_purge", "web_ground", "web_retrieve", "web_search"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = McpWebServer::new(state().await);
        let info = server.get_info();
        assert_eq!(info.server_info.name, "mcp-web-ground");
        assert!(info.capabilities.tools.is_some());
    }
}
