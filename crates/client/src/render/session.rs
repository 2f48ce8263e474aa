//! Scoped browser session.
//!
//! One Chromium process per session. Teardown happens on every exit path:
//! [`BrowserSession::close`] shuts the browser down gracefully, and dropping
//! the session (early return, error, or a cancelled future) aborts the CDP
//! event task while chromiumoxide's `Browser` drop kills the child process.

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;

use super::RenderError;

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// A launched headless browser and its CDP event pump.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    profile_dir: PathBuf,
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("open", &self.browser.is_some())
            .field("profile_dir", &self.profile_dir)
            .finish()
    }
}

impl BrowserSession {
    /// Launch a browser from `builder`, giving it a private profile directory so
    /// concurrent sessions never contend for the same profile lock.
    pub async fn launch(builder: chromiumoxide::browser::BrowserConfigBuilder) -> Result<Self, RenderError> {
        let profile_dir = std::env::temp_dir().join(format!(
            "webground-chrome-{}-{}",
            std::process::id(),
            SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        let config: BrowserConfig = builder
            .user_data_dir(&profile_dir)
            .build()
            .map_err(RenderError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        tracing::debug!(profile = %profile_dir.display(), "browser session launched");

        Ok(Self { browser: Some(browser), handler, profile_dir })
    }

    /// Open a new tab navigated to `url`.
    pub async fn open(&self, url: &str) -> Result<Page, RenderError> {
        let browser = self.browser.as_ref().ok_or(RenderError::BrowserClosed)?;
        browser
            .new_page(url)
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))
    }

    /// Gracefully close the browser and wait for the process to exit.
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::debug!("browser close failed: {e}");
            }
            let _ = browser.wait().await;
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.browser.take().is_some() {
            tracing::debug!("browser session dropped without close; killing process");
        }
        let _ = std::fs::remove_dir_all(&self.profile_dir);
    }
}
