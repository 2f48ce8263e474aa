//! Cache key derivation for URLs.

use sha2::{Digest, Sha256};

/// Namespace tag separating content entries from unrelated key spaces.
pub const NAMESPACE: &str = "scrape";

/// Number of URL characters kept verbatim in a key.
pub const MAX_URL_CHARS: usize = 200;

/// Derive the cache key for `url`.
///
/// The key is `scrape:` followed by the first 200 characters of the URL with
/// whitespace and control characters replaced by `_`. Longer URLs get a
/// `#` plus 16 hex digits of the full URL's SHA-256 appended, so two long
/// URLs that share a prefix still map to different keys.
pub fn cache_key(url: &str) -> String {
    let url = url.trim();
    let prefix: String = url
        .chars()
        .take(MAX_URL_CHARS)
        .map(|c| if c.is_whitespace() || c.is_control() { '_' } else { c })
        .collect();

    if url.chars().count() <= MAX_URL_CHARS {
        return format!("{NAMESPACE}:{prefix}");
    }

    let digest = Sha256::digest(url.as_bytes());
    format!("{NAMESPACE}:{prefix}#{}", &hex::encode(digest)[..16])
}
