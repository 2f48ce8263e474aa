//! The extraction record stored in, and served from, the content cache.

use serde::{Deserialize, Serialize};

/// Heading text grouped by level.
///
/// Each field is the whitespace-normalized concatenation of every heading of
/// that level, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Headings {
    pub h1: String,
    pub h2: String,
}

/// Result of retrieving one URL.
///
/// Records are produced for failures too: `error` holds the description and
/// `content` repeats it, so consumers always get a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Canonical source URL.
    pub url: String,
    /// Page title, possibly empty.
    pub title: String,
    pub headings: Headings,
    /// Meta description, possibly empty.
    pub meta_description: String,
    /// Normalized, length-bounded plain text.
    pub content: String,
    /// `None` iff extraction fully succeeded.
    pub error: Option<String>,
    /// Epoch milliseconds, stamped when the record is written to cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<i64>,
}

impl ExtractionResult {
    /// Build a failure record for `url`.
    pub fn failure(url: impl Into<String>, error: impl ToString) -> Self {
        let message = error.to_string();
        Self {
            url: url.into(),
            title: String::new(),
            headings: Headings::default(),
            meta_description: String::new(),
            content: message.clone(),
            error: Some(message),
            cached_at: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Check the record's shape.
    ///
    /// Deserialization already guarantees field presence and types; this adds
    /// the semantic constraints a well-formed record must meet.
    pub fn validate(&self, content_cap: usize) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("url is empty".into());
        }
        if let Some(error) = &self.error
            && error.trim().is_empty()
        {
            return Err("error is present but empty".into());
        }
        if self.error.is_none() && self.content.chars().count() > content_cap {
            return Err(format!("content exceeds {content_cap} characters"));
        }
        if self.cached_at.is_some_and(|ts| ts < 0) {
            return Err("cachedAt is negative".into());
        }
        Ok(())
    }
}
