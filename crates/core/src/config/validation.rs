//! Configuration validation rules.
//!
//! Checks `AppConfig` values after they have been loaded from environment,
//! files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` or `render_timeout_ms` is outside 100ms..=5 minutes
    /// - `user_agent` is empty
    /// - `content_cap` is 0
    /// - `max_cache_entry_bytes` is 0 or exceeds 16MB
    /// - `cache_ttl_secs` is 0 or exceeds 365 days
    /// - `search_top_n` is outside 1..=10
    /// - `search_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        for (field, value) in [("timeout_ms", self.timeout_ms), ("render_timeout_ms", self.render_timeout_ms)] {
            if value < 100 {
                return Err(invalid(field, "must be at least 100ms"));
            }
            if value > 300_000 {
                return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.content_cap == 0 {
            return Err(invalid("content_cap", "must be greater than 0"));
        }

        if self.max_cache_entry_bytes == 0 || self.max_cache_entry_bytes > 16 * 1024 * 1024 {
            return Err(invalid("max_cache_entry_bytes", "must be between 1 byte and 16MB"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0"));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(invalid("cache_ttl_secs", "must not exceed 365 days"));
        }

        if !(1..=10).contains(&self.search_top_n) {
            return Err(invalid("search_top_n", "must be between 1 and 10"));
        }

        if !(self.search_url.starts_with("https://") || self.search_url.starts_with("http://")) {
            return Err(invalid("search_url", "must be an http(s) URL"));
        }

        if self.render_enabled && self.dynamic_domains.is_empty() {
            tracing::warn!("render_enabled is set but dynamic_domains is empty; only search uses the browser");
        }

        Ok(())
    }
}
