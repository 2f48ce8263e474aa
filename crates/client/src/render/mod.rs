//! Headless browser rendering for JS-heavy pages.
//!
//! The [`Renderer`] trait is always available so the dynamic extractor and the
//! search fallback can be driven by fakes. The chromiumoxide implementation
//! is behind the `render` feature.

#[cfg(feature = "render")]
mod headless;
#[cfg(feature = "render")]
mod session;

#[cfg(feature = "render")]
pub use headless::{HeadlessRenderer, LaunchConfig};
#[cfg(feature = "render")]
pub use session::BrowserSession;

use thiserror::Error;
use url::Url;
use webground_core::AppConfig;

/// Errors that can occur during page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to get page content.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Timeout waiting for page to load.
    #[error("render timeout after {0}ms")]
    Timeout(u64),

    /// Browser closed unexpectedly.
    #[error("browser closed unexpectedly")]
    BrowserClosed,
}

impl From<RenderError> for webground_core::Error {
    fn from(err: RenderError) -> Self {
        webground_core::Error::RenderFailed(err.to_string())
    }
}

/// Options for rendering a page.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Bound on navigation plus settling, in milliseconds (default: 30000).
    pub timeout_ms: u64,

    /// Quiet period with no new network resources before the page counts as
    /// settled, in milliseconds (default: 1000).
    pub quiet_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { timeout_ms: 30000, quiet_ms: 1000 }
    }
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self { timeout_ms: config.render_timeout_ms, ..Default::default() }
    }
}

/// Result of rendering a page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Serialized live DOM.
    pub html: String,

    /// Final URL after redirects.
    pub final_url: Url,

    /// Time taken to render in milliseconds.
    pub render_time_ms: u64,
}

/// Renderer trait for headless browser page rendering.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Render a URL to HTML via headless browser.
    async fn render(&self, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_maps_to_render_failed() {
        let err: webground_core::Error = RenderError::Timeout(250).into();
        assert_eq!(err.to_string(), "RENDER_FAILED: render timeout after 250ms");
    }

    #[test]
    fn test_render_options_from_config() {
        let config = AppConfig { render_timeout_ms: 4500, ..Default::default() };
        let opts = RenderOptions::from(&config);
        assert_eq!(opts.timeout_ms, 4500);
        assert_eq!(opts.quiet_ms, RenderOptions::default().quiet_ms);
    }
}
