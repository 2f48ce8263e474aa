//! Static extraction: plain HTTP fetch plus HTML parsing.

use super::{ContentExtractor, ExtractOptions, parse_document};
use crate::fetch::{FetchClient, FetchConfig, canonicalize};
use webground_core::{AppConfig, Error, ExtractionResult};

/// Extractor for pages whose content is present in the raw HTTP response.
#[derive(Debug, Clone)]
pub struct StaticExtractor {
    client: FetchClient,
    opts: ExtractOptions,
}

impl StaticExtractor {
    pub fn new(client: FetchClient, opts: ExtractOptions) -> Self {
        Self { client, opts }
    }

    /// Build from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self::new(FetchClient::new(FetchConfig::from(config))?, ExtractOptions::from(config)))
    }

    async fn try_extract(&self, url: &str) -> Result<ExtractionResult, Error> {
        let response = self.client.fetch(url).await?;

        if !response.is_textual() {
            return Err(Error::ExtractFailed(format!(
                "unsupported content type: {}",
                response.content_type.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(parse_document(&response.text(), response.url.as_str(), &self.opts))
    }
}

#[async_trait::async_trait]
impl ContentExtractor for StaticExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        match self.try_extract(url).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(%url, error = %e, "static extraction failed");
                failure_record(url, e)
            }
        }
    }
}

/// Error record keyed by the canonical URL when `url` canonicalizes.
pub(crate) fn failure_record(url: &str, error: Error) -> ExtractionResult {
    let record_url = canonicalize(url).map(|u| u.to_string()).unwrap_or_else(|_| url.trim().to_string());
    ExtractionResult::failure(record_url, error)
}
