//! Retrieval orchestration: cache lookup, strategy dispatch, cache write.

use std::sync::Arc;

use crate::extract::{ContentExtractor, DynamicExtractor, ExtractOptions, StaticExtractor};
use crate::fetch::canonicalize;
use crate::render::{RenderOptions, Renderer};
use crate::strategy::{Strategy, StrategySelector};
use webground_core::{AppConfig, CacheConfig, CacheWrite, ContentCache, Error, ExtractionResult, KvStore};

/// Cache-aside retrieval of a single URL.
///
/// [`Retriever::retrieve`] never fails: every outcome, including cache and
/// network trouble, ends in an [`ExtractionResult`].
#[derive(Clone)]
pub struct Retriever {
    cache: ContentCache,
    selector: StrategySelector,
    static_extractor: Arc<dyn ContentExtractor>,
    /// `None` when rendering is disabled; dynamic URLs then go static.
    dynamic_extractor: Option<Arc<dyn ContentExtractor>>,
    cache_errors: bool,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("cache", &self.cache)
            .field("selector", &self.selector)
            .field("dynamic", &self.dynamic_extractor.is_some())
            .field("cache_errors", &self.cache_errors)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    pub fn new(
        cache: ContentCache, selector: StrategySelector, static_extractor: Arc<dyn ContentExtractor>,
        dynamic_extractor: Option<Arc<dyn ContentExtractor>>,
    ) -> Self {
        Self { cache, selector, static_extractor, dynamic_extractor, cache_errors: true }
    }

    /// Whether failure records are cached too (default: true).
    pub fn with_cache_errors(mut self, cache_errors: bool) -> Self {
        self.cache_errors = cache_errors;
        self
    }

    /// Wire the full pipeline from application config.
    ///
    /// `renderer` is ignored when `render_enabled` is off.
    pub fn from_config(
        config: &AppConfig, store: Arc<dyn KvStore>, renderer: Option<Arc<dyn Renderer>>,
    ) -> Result<Self, Error> {
        let cache = ContentCache::new(store, CacheConfig::from(config));
        let selector = StrategySelector::new(&config.dynamic_domains);
        let static_extractor = Arc::new(StaticExtractor::from_config(config)?);
        let dynamic_extractor = renderer.filter(|_| config.render_enabled).map(|r| {
            Arc::new(DynamicExtractor::new(r, RenderOptions::from(config), ExtractOptions::from(config)))
                as Arc<dyn ContentExtractor>
        });

        Ok(Self::new(cache, selector, static_extractor, dynamic_extractor).with_cache_errors(config.cache_errors))
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Strategy that would be used for `url`, after fallback for a missing
    /// dynamic extractor.
    pub fn strategy_for(&self, url: &str) -> Strategy {
        match self.selector.select(url) {
            Strategy::Dynamic if self.dynamic_extractor.is_some() => Strategy::Dynamic,
            _ => Strategy::Static,
        }
    }

    /// Cached or freshly extracted record for `url`.
    pub async fn retrieve(&self, url: &str) -> ExtractionResult {
        let Ok(canonical) = canonicalize(url) else {
            // malformed: let the extractor report it, nothing to cache under
            return self.static_extractor.extract(url).await;
        };
        let url = canonical.as_str();

        match self.cache.get(url).await {
            Ok(Some(hit)) => return hit,
            Ok(None) => {}
            Err(e) => tracing::warn!(%url, error = %e, "cache read failed; treating as miss"),
        }

        let strategy = self.strategy_for(url);
        tracing::info!(%url, strategy = strategy.as_str(), "extracting");

        let result = match (strategy, &self.dynamic_extractor) {
            (Strategy::Dynamic, Some(dynamic)) => dynamic.extract(url).await,
            _ => self.static_extractor.extract(url).await,
        };

        if result.is_success() || self.cache_errors {
            match self.cache.set(url, &result).await {
                Ok(CacheWrite::Stored { .. }) | Ok(CacheWrite::Rejected { .. }) => {}
                Err(e) => tracing::warn!(%url, error = %e, "cache write failed"),
            }
        }

        result
    }
}
