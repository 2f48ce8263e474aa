//! Grounding a chat message in web sources.
//!
//! A message that mentions a URL is grounded in that page; anything else goes
//! through the search fallback.

use serde::Serialize;
use std::sync::Arc;

use crate::extract::normalize;
use crate::fetch::find_url;
use crate::retrieve::Retriever;
use crate::search::SearchFallback;
use webground_core::ExtractionResult;

/// Sources gathered for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct Grounding {
    /// URL found in the message, if any.
    pub url: Option<String>,
    /// The question with the URL removed.
    pub query: String,
    /// Records to ground an answer in. With a URL this is exactly one record,
    /// kept even on failure so the caller sees the diagnostic.
    pub sources: Vec<ExtractionResult>,
}

#[derive(Debug, Clone)]
pub struct Grounder {
    retriever: Arc<Retriever>,
    /// `None` when no browser is available; URL-less messages then get no sources.
    search: Option<SearchFallback>,
}

impl Grounder {
    pub fn new(retriever: Arc<Retriever>, search: Option<SearchFallback>) -> Self {
        Self { retriever, search }
    }

    pub async fn ground(&self, message: &str) -> Grounding {
        if let Some(url) = find_url(message) {
            let query = normalize(&message.replacen(url, " ", 1));
            let source = self.retriever.retrieve(url).await;
            return Grounding { url: Some(url.to_string()), query, sources: vec![source] };
        }

        let query = normalize(message);
        let sources = match &self.search {
            Some(search) => search.search_and_retrieve(&query).await,
            None => {
                tracing::debug!("no search fallback configured");
                Vec::new()
            }
        };

        Grounding { url: None, query, sources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ContentExtractor;
    use crate::render::{RenderError, RenderOptions, RenderedPage, Renderer};
    use crate::strategy::StrategySelector;
    use url::Url;
    use webground_core::{CacheConfig, ContentCache, MemoryStore};

    struct Stub;

    #[async_trait::async_trait]
    impl ContentExtractor for Stub {
        async fn extract(&self, url: &str) -> ExtractionResult {
            if url.contains("down") {
                return ExtractionResult::failure(url, "HTTP_ERROR: status 502");
            }
            let mut r = ExtractionResult::failure(url, "unused");
            r.error = None;
            r.content = "page text".into();
            r
        }
    }

    struct OneResult;

    #[async_trait::async_trait]
    impl Renderer for OneResult {
        async fn render(&self, url: &Url, _opts: &RenderOptions) -> Result<RenderedPage, RenderError> {
            let html = r#"<div id="search"><div class="g"><a href="https://found.example/"><h3>Found</h3></a></div></div>"#;
            Ok(RenderedPage { html: html.into(), final_url: url.clone(), render_time_ms: 1 })
        }
    }

    fn retriever() -> Arc<Retriever> {
        let cache = ContentCache::new(Arc::new(MemoryStore::new()), CacheConfig::default());
        Arc::new(Retriever::new(cache, StrategySelector::default(), Arc::new(Stub), None))
    }

    fn grounder(with_search: bool) -> Grounder {
        let retriever = retriever();
        let search = with_search.then(|| {
            SearchFallback::new(
                Arc::new(OneResult),
                retriever.clone(),
                Url::parse("https://www.google.com/search").unwrap(),
                3,
                RenderOptions::default(),
            )
        });
        Grounder::new(retriever, search)
    }

    #[tokio::test]
    async fn test_message_with_url_retrieves_it() {
        let g = grounder(true).ground("what does https://example.com/post say about lifetimes?").await;

        assert_eq!(g.url.as_deref(), Some("https://example.com/post"));
        assert_eq!(g.query, "what does say about lifetimes?");
        assert_eq!(g.sources.len(), 1);
        assert_eq!(g.sources[0].content, "page text");
    }

    #[tokio::test]
    async fn test_failed_url_source_is_kept() {
        let g = grounder(true).ground("summarize https://down.example/page").await;

        assert_eq!(g.sources.len(), 1);
        assert!(g.sources[0].error.is_some());
        assert_eq!(g.query, "summarize");
    }

    #[tokio::test]
    async fn test_message_without_url_uses_search() {
        let g = grounder(true).ground("  how do   rust traits work ").await;

        assert!(g.url.is_none());
        assert_eq!(g.query, "how do rust traits work");
        assert_eq!(g.sources.len(), 1);
        assert_eq!(g.sources[0].url, "https://found.example/");
    }

    #[tokio::test]
    async fn test_no_search_configured() {
        let g = grounder(false).ground("how do rust traits work").await;
        assert!(g.sources.is_empty());
    }
}
