//! mcp-web-ground server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webground_client::{Renderer, Retriever, SearchFallback};
use webground_core::{AppConfig, CacheDb};

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!(
        db = %config.db_path.display(),
        render = config.render_enabled,
        "Starting mcp-web-ground server on stdio transport"
    );

    let db = CacheDb::open(&config.db_path).await?;
    match db.purge_expired().await {
        Ok(n) if n > 0 => tracing::info!(deleted = n, "purged expired cache entries"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "startup purge failed"),
    }

    let renderer = build_renderer(&config);
    let retriever = Arc::new(Retriever::from_config(&config, Arc::new(db.clone()), renderer.clone())?);
    let search = renderer
        .map(|r| SearchFallback::from_config(r, retriever.clone(), &config))
        .transpose()?;

    let handler = handler::McpWebServer::new(state::AppState::new(db, retriever, search));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

#[cfg(feature = "render")]
fn build_renderer(config: &AppConfig) -> Option<Arc<dyn Renderer>> {
    use webground_client::render::{HeadlessRenderer, LaunchConfig};

    config
        .render_enabled
        .then(|| Arc::new(HeadlessRenderer::new(LaunchConfig::from(config))) as Arc<dyn Renderer>)
}

#[cfg(not(feature = "render"))]
fn build_renderer(config: &AppConfig) -> Option<Arc<dyn Renderer>> {
    if config.render_enabled {
        tracing::warn!("render_enabled is set but this build has no browser support; using static extraction only");
    }
    None
}
