//! Dynamic extraction: render in a headless browser, then parse the live DOM.

use std::sync::Arc;

use super::fetched::failure_record;
use super::{ContentExtractor, ExtractOptions, parse_document};
use crate::fetch::canonicalize;
use crate::render::{RenderOptions, Renderer};
use webground_core::{Error, ExtractionResult};

/// Extractor for script-heavy pages.
#[derive(Clone)]
pub struct DynamicExtractor {
    renderer: Arc<dyn Renderer>,
    render: RenderOptions,
    opts: ExtractOptions,
}

impl std::fmt::Debug for DynamicExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicExtractor")
            .field("render", &self.render)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl DynamicExtractor {
    pub fn new(renderer: Arc<dyn Renderer>, render: RenderOptions, opts: ExtractOptions) -> Self {
        Self { renderer, render, opts }
    }

    async fn try_extract(&self, url: &str) -> Result<ExtractionResult, Error> {
        let url = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let page = self.renderer.render(&url, &self.render).await?;
        Ok(parse_document(&page.html, url.as_str(), &self.opts))
    }
}

#[async_trait::async_trait]
impl ContentExtractor for DynamicExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        match self.try_extract(url).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(%url, error = %e, "dynamic extraction failed");
                failure_record(url, e)
            }
        }
    }
}
