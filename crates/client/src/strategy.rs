//! Extraction strategy selection.
//!
//! A static policy table: hosts on the deny-list need script execution, all
//! other hosts are parsed from the raw HTTP response.

use url::Url;

/// How a URL's content is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Fetch over HTTP and parse the returned HTML.
    Static,
    /// Render in a headless browser and read the live DOM.
    Dynamic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Static => "static",
            Strategy::Dynamic => "dynamic",
        }
    }
}

/// Classifies URLs by host against a domain deny-list.
#[derive(Debug, Clone, Default)]
pub struct StrategySelector {
    dynamic_domains: Vec<String>,
}

impl StrategySelector {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dynamic_domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { dynamic_domains }
    }

    /// Whether `url` needs a headless browser.
    ///
    /// A host matches a listed domain when it equals it or is a subdomain of
    /// it. Malformed URLs and URLs without a host return `false`.
    pub fn needs_dynamic_rendering(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        self.dynamic_domains.iter().any(|domain| {
            host == *domain || host.strip_suffix(domain.as_str()).is_some_and(|rest| rest.ends_with('.'))
        })
    }

    pub fn select(&self, url: &str) -> Strategy {
        if self.needs_dynamic_rendering(url) { Strategy::Dynamic } else { Strategy::Static }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webground_core::config::DEFAULT_DYNAMIC_DOMAINS;

    fn selector() -> StrategySelector {
        StrategySelector::new(DEFAULT_DYNAMIC_DOMAINS)
    }

    #[test]
    fn test_listed_domain_is_dynamic() {
        assert!(selector().needs_dynamic_rendering("https://reddit.com/r/rust"));
        assert!(selector().needs_dynamic_rendering("https://x.com/someone/status/1"));
    }

    #[test]
    fn test_subdomain_is_dynamic() {
        assert!(selector().needs_dynamic_rendering("https://www.reddit.com/r/rust"));
        assert!(selector().needs_dynamic_rendering("https://old.reddit.com/"));
    }

    #[test]
    fn test_suffix_without_label_boundary_is_static() {
        assert!(!selector().needs_dynamic_rendering("https://notreddit.com/"));
        assert!(!selector().needs_dynamic_rendering("https://box.com/"));
    }

    #[test]
    fn test_unlisted_domain_is_static() {
        assert_eq!(selector().select("https://example.com/article"), Strategy::Static);
    }

    #[test]
    fn test_malformed_url_fails_open() {
        assert!(!selector().needs_dynamic_rendering("not a url"));
        assert!(!selector().needs_dynamic_rendering(""));
        assert!(!selector().needs_dynamic_rendering("mailto:someone@reddit.com"));
    }

    #[test]
    fn test_host_case_and_trailing_dot() {
        assert!(selector().needs_dynamic_rendering("https://WWW.Reddit.COM./r/rust"));
    }

    #[test]
    fn test_decision_depends_only_on_host() {
        let s = selector();
        let a = s.select("https://www.linkedin.com/in/a?x=1");
        let b = s.select("http://www.linkedin.com/feed/#top");
        assert_eq!(a, b);
        for _ in 0..3 {
            assert_eq!(s.select("https://example.org/a"), s.select("https://example.org/b"));
        }
    }

    #[test]
    fn test_custom_list_normalization() {
        let s = StrategySelector::new([" .Example.ORG ", ""]);
        assert!(s.needs_dynamic_rendering("https://app.example.org/"));
    }
}
