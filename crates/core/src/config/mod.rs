//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from multiple sources:
//!
//! 1. Environment variables (WEBGROUND_*)
//! 2. TOML config file (if WEBGROUND_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Domains whose pages need script execution before content is readable.
pub const DEFAULT_DYNAMIC_DOMAINS: &[&str] = &[
    "twitter.com",
    "x.com",
    "instagram.com",
    "facebook.com",
    "linkedin.com",
    "reddit.com",
    "spa.com",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEBGROUND_*)
/// 2. TOML config file (if WEBGROUND_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via WEBGROUND_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests and the headless browser.
    ///
    /// Set via WEBGROUND_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via WEBGROUND_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via WEBGROUND_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether the headless browser path is enabled.
    ///
    /// Set via WEBGROUND_RENDER_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub render_enabled: bool,

    /// Navigation budget for the headless browser in milliseconds.
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Explicit Chrome/Chromium binary; autodetected when unset.
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Domains routed to the headless browser.
    ///
    /// Set via WEBGROUND_DYNAMIC_DOMAINS environment variable (array syntax,
    /// e.g. `["x.com","reddit.com"]`).
    #[serde(default = "default_dynamic_domains")]
    pub dynamic_domains: Vec<String>,

    /// Also drop nav/header/footer/aside before extracting text.
    #[serde(default = "default_true")]
    pub strip_chrome: bool,

    /// Maximum characters of normalized content per record.
    #[serde(default = "default_content_cap")]
    pub content_cap: usize,

    /// Cache entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum serialized size of a cache entry in bytes.
    #[serde(default = "default_max_cache_entry_bytes")]
    pub max_cache_entry_bytes: usize,

    /// Whether failure records are cached like successes.
    #[serde(default = "default_true")]
    pub cache_errors: bool,

    /// Search results page; the query is appended as `q`.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Number of search results retrieved by the search fallback.
    #[serde(default = "default_search_top_n")]
    pub search_top_n: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./webground-cache.sqlite")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
        .into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_render_timeout_ms() -> u64 {
    30_000
}

fn default_dynamic_domains() -> Vec<String> {
    DEFAULT_DYNAMIC_DOMAINS.iter().map(|d| d.to_string()).collect()
}

fn default_content_cap() -> usize {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_max_cache_entry_bytes() -> usize {
    1_048_576
}

fn default_search_url() -> String {
    "https://www.google.com/search".into()
}

fn default_search_top_n() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            render_enabled: true,
            render_timeout_ms: default_render_timeout_ms(),
            chrome_executable: None,
            dynamic_domains: default_dynamic_domains(),
            strip_chrome: true,
            content_cap: default_content_cap(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_cache_entry_bytes: default_max_cache_entry_bytes(),
            cache_errors: true,
            search_url: default_search_url(),
            search_top_n: default_search_top_n(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEBGROUND_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("WEBGROUND_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./webground-cache.sqlite"));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
        assert!(config.render_enabled);
        assert_eq!(config.content_cap, 10_000);
        assert_eq!(config.cache_ttl_secs, 604_800);
        assert_eq!(config.max_cache_entry_bytes, 1_048_576);
        assert_eq!(config.search_top_n, 3);
        assert!(config.dynamic_domains.iter().any(|d| d == "reddit.com"));
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.render_timeout(), Duration::from_millis(30_000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WEBGROUND_TIMEOUT_MS", "5000");
            jail.set_env("WEBGROUND_RENDER_ENABLED", "false");

            let config: AppConfig = AppConfig::figment().extract()?;
            assert_eq!(config.timeout_ms, 5000);
            assert!(!config.render_enabled);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_layer() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("webground.toml", "search_top_n = 5\ndynamic_domains = [\"example.org\"]")?;
            jail.set_env("WEBGROUND_CONFIG_FILE", "webground.toml");

            let config: AppConfig = AppConfig::figment().extract()?;
            assert_eq!(config.search_top_n, 5);
            assert_eq!(config.dynamic_domains, vec!["example.org".to_string()]);
            Ok(())
        });
    }
}
