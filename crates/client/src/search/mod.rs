//! Search fallback.
//!
//! When a question names no URL, render a web search for it, take the top
//! organic results, and retrieve each one concurrently.
//!
//! ### Failure Contract
//! - Empty query, unparsable results page, or render failure: empty vector.
//! - Per-result failures are dropped; only successful records are returned.

pub mod results;

pub use results::{SearchResult, parse_results};

use futures_util::future::join_all;
use std::sync::Arc;
use url::Url;

use crate::render::{RenderOptions, Renderer};
use crate::retrieve::Retriever;
use webground_core::{AppConfig, Error, ExtractionResult};

/// Renders a search page and retrieves its top results.
#[derive(Clone)]
pub struct SearchFallback {
    renderer: Arc<dyn Renderer>,
    retriever: Arc<Retriever>,
    search_url: Url,
    top_n: usize,
    render: RenderOptions,
}

impl std::fmt::Debug for SearchFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchFallback")
            .field("search_url", &self.search_url.as_str())
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

impl SearchFallback {
    pub fn new(
        renderer: Arc<dyn Renderer>, retriever: Arc<Retriever>, search_url: Url, top_n: usize, render: RenderOptions,
    ) -> Self {
        Self { renderer, retriever, search_url, top_n, render }
    }

    /// Build from application config.
    pub fn from_config(renderer: Arc<dyn Renderer>, retriever: Arc<Retriever>, config: &AppConfig) -> Result<Self, Error> {
        let search_url = Url::parse(&config.search_url).map_err(|e| Error::InvalidUrl(format!("search_url: {}", e)))?;
        Ok(Self::new(renderer, retriever, search_url, config.search_top_n, RenderOptions::from(config)))
    }

    /// Search results for `query`, without retrieving them.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);

        let page = self.renderer.render(&url, &self.render).await?;
        let engine_host = self.search_url.host_str().unwrap_or_default();
        Ok(parse_results(&page.html, engine_host, self.top_n))
    }

    /// Retrieve the top results for `query`. Never fails; see module docs.
    pub async fn search_and_retrieve(&self, query: &str) -> Vec<ExtractionResult> {
        let hits = match self.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(%query, error = %e, "search failed");
                return Vec::new();
            }
        };

        let found = hits.len();
        let results: Vec<ExtractionResult> = join_all(hits.iter().map(|hit| self.retriever.retrieve(&hit.url)))
            .await
            .into_iter()
            .filter(ExtractionResult::is_success)
            .collect();

        tracing::info!(%query, found, retrieved = results.len(), "search fallback complete");
        results
    }
}
