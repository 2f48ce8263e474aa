//! chromiumoxide-backed [`Renderer`].

use chromiumoxide::Page;
use chromiumoxide::browser::BrowserConfig;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;
use webground_core::AppConfig;

use super::session::BrowserSession;
use super::{RenderError, RenderOptions, RenderedPage, Renderer};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser launch settings.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub user_agent: String,
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
    pub window: (u32, u32),
}

impl From<&AppConfig> for LaunchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            chrome_executable: config.chrome_executable.clone(),
            window: (1280, 720),
        }
    }
}

/// Headless Chrome/Chromium renderer.
///
/// Launches a fresh [`BrowserSession`] per call, so no browser state leaks
/// between renders and nothing stays running between calls.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    launch: LaunchConfig,
}

impl HeadlessRenderer {
    pub fn new(launch: LaunchConfig) -> Self {
        Self { launch }
    }

    fn builder(&self) -> chromiumoxide::browser::BrowserConfigBuilder {
        let (width, height) = self.launch.window;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--mute-audio")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", self.launch.user_agent));

        if let Some(exe) = &self.launch.chrome_executable {
            builder = builder.chrome_executable(exe);
        }
        builder
    }

    async fn render_in(session: &BrowserSession, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError> {
        let start = Instant::now();
        let page = session.open(url.as_str()).await?;

        wait_until_settled(&page, opts.quiet_ms).await;

        let html = page
            .content()
            .await
            .map_err(|e| RenderError::ContentRetrieval(e.to_string()))?;

        let page_url = page
            .url()
            .await
            .map_err(|e| RenderError::ContentRetrieval(e.to_string()))?;

        let final_url = page_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .unwrap_or_else(|| url.clone());

        page.close().await.ok();

        Ok(RenderedPage { html, final_url, render_time_ms: start.elapsed().as_millis() as u64 })
    }
}

#[async_trait::async_trait]
impl Renderer for HeadlessRenderer {
    async fn render(&self, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError> {
        let session = BrowserSession::launch(self.builder()).await?;

        let outcome = tokio::time::timeout(
            Duration::from_millis(opts.timeout_ms),
            Self::render_in(&session, url, opts),
        )
        .await;

        session.close().await;

        let page = outcome.map_err(|_| RenderError::Timeout(opts.timeout_ms))??;
        tracing::debug!(%url, final_url = %page.final_url, ms = page.render_time_ms, "rendered page");
        Ok(page)
    }
}

/// Poll until `document.readyState` is `complete` and the resource-entry count
/// has been unchanged for `quiet_ms`. Unbounded; the caller owns the timeout.
async fn wait_until_settled(page: &Page, quiet_ms: u64) {
    let mut last_count = 0u64;
    let mut stable_since = Instant::now();

    loop {
        let count = page
            .evaluate("performance.getEntriesByType('resource').length")
            .await
            .ok()
            .and_then(|v| v.into_value::<serde_json::Value>().ok())
            .and_then(|j| j.as_u64())
            .unwrap_or(0);

        let complete = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|v| v.into_value::<serde_json::Value>().ok())
            .is_some_and(|j| j.as_str() == Some("complete"));

        if !complete || count != last_count {
            last_count = count;
            stable_since = Instant::now();
        } else if stable_since.elapsed() >= Duration::from_millis(quiet_ms) {
            tracing::debug!(resources = count, "page settled");
            return;
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> HeadlessRenderer {
        HeadlessRenderer::new(LaunchConfig::from(&AppConfig::default()))
    }

    #[test]
    fn test_launch_config_from_app_config() {
        let config = AppConfig { chrome_executable: Some(PathBuf::from("/usr/bin/chromium")), ..Default::default() };
        let launch = LaunchConfig::from(&config);
        assert_eq!(launch.chrome_executable.as_deref(), Some(std::path::Path::new("/usr/bin/chromium")));
        assert!(launch.user_agent.contains("Mozilla/5.0"));
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_session_launch_and_close() {
        let session = BrowserSession::launch(renderer().builder()).await.unwrap();
        session.close().await;
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_session_dropped_without_close() {
        let session = BrowserSession::launch(renderer().builder()).await.unwrap();
        drop(session);
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_render_simple_page() {
        let url = Url::parse("https://example.com").unwrap();
        let page = renderer().render(&url, &RenderOptions::default()).await.unwrap();

        assert!(page.html.contains("Example Domain"));
        assert_eq!(page.final_url.as_str(), "https://example.com/");
    }
}
