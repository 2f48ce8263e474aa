//! Parsing of a rendered search results page.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use crate::extract::normalize;

/// Result block containers, most specific first. Blocks may nest, so results
/// are de-duplicated by URL.
const CONTAINERS: &[&str] = &["div#search div.MjjYud", "div#search div.g", "div.g"];

/// Snippet candidates; the markup changes often.
const SNIPPETS: &[&str] = &["div.VwiC3b", "div.IsZvec", "span.aCOpRe", "div.MUxGbd"];

static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector"));
static H3: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").expect("invalid selector"));

/// One organic search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Extract up to `max` organic results from a results page.
///
/// Links pointing back at `engine_host` (the search engine itself) are
/// dropped. Blocks without a titled outbound link are skipped.
pub fn parse_results(html: &str, engine_host: &str, max: usize) -> Vec<SearchResult> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    'outer: for css in CONTAINERS {
        let Ok(container_sel) = Selector::parse(css) else {
            continue;
        };

        for container in doc.select(&container_sel) {
            if out.len() >= max {
                break 'outer;
            }

            let Some((url, title)) = titled_link(&container) else {
                continue;
            };

            if is_engine_link(&url, engine_host) || !seen.insert(url.clone()) {
                continue;
            }

            out.push(SearchResult { url, title, snippet: snippet(&container) });
        }
    }

    out
}

/// First `<a>` wrapping an `<h3>`, with Google's `/url?q=` redirect unwrapped.
fn titled_link(container: &ElementRef<'_>) -> Option<(String, String)> {
    container.select(&LINK).find_map(|a| {
        let h3 = a.select(&H3).next()?;
        let url = unwrap_href(a.value().attr("href")?)?;
        let title = normalize(&h3.text().collect::<Vec<_>>().join(" "));
        (!title.is_empty()).then_some((url, title))
    })
}

fn unwrap_href(href: &str) -> Option<String> {
    if href.starts_with("/url?") {
        let url = Url::parse(&format!("https://www.google.com{}", href)).ok()?;
        return url
            .query_pairs()
            .find(|(k, v)| (k == "q" || k == "url") && !v.is_empty())
            .map(|(_, v)| v.into_owned())
            .filter(|v| v.starts_with("http://") || v.starts_with("https://"));
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    None
}

fn is_engine_link(url: &str, engine_host: &str) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase)) else {
        return true;
    };
    let engine = engine_host.to_ascii_lowercase();
    host.trim_start_matches("www.") == engine.trim_start_matches("www.")
}

fn snippet(container: &ElementRef<'_>) -> String {
    SNIPPETS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|sel| {
            let text = normalize(&container.select(&sel).next()?.text().collect::<Vec<_>>().join(" "));
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_default()
}
