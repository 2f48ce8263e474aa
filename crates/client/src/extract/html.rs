//! Structured field extraction from an HTML document.
//!
//! Shared by the static and dynamic extractors: both end up holding an HTML
//! string (the raw response or the serialized live DOM) and run it through
//! [`parse_document`].

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::normalize::{bounded, combine, normalize};
use webground_core::{ExtractionResult, Headings};

/// Elements whose text never contributes to any field.
const ALWAYS_SKIPPED: &[&str] = &["script", "style", "noscript", "iframe", "template"];

/// Page chrome, skipped when `strip_chrome` is on.
const CHROME: &[&str] = &["nav", "header", "footer", "aside"];

/// Semantic containers that hold the main content, in no particular priority.
const CONTAINERS: &str = "article, main, .content, .main, #main, #content";

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").expect("invalid selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("invalid selector"));
static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("invalid selector"));
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("invalid selector"));
static CONTAINER: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CONTAINERS).expect("invalid selector"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).expect("invalid selector"));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).expect("invalid selector"));

/// Options controlling field extraction.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Drop `nav`, `header`, `footer`, and `aside` subtrees.
    pub strip_chrome: bool,
    /// Maximum characters of `content`.
    pub content_cap: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { strip_chrome: true, content_cap: webground_core::cache::content::DEFAULT_CONTENT_CAP }
    }
}

impl From<&webground_core::AppConfig> for ExtractOptions {
    fn from(config: &webground_core::AppConfig) -> Self {
        Self { strip_chrome: config.strip_chrome, content_cap: config.content_cap }
    }
}

impl ExtractOptions {
    fn skips(&self, tag: &str) -> bool {
        ALWAYS_SKIPPED.contains(&tag) || (self.strip_chrome && CHROME.contains(&tag))
    }

    /// Whether `el` or any of its ancestors is a skipped element.
    fn is_hidden(&self, el: &ElementRef<'_>) -> bool {
        self.skips(el.value().name())
            || el
                .ancestors()
                .filter_map(|n| n.value().as_element())
                .any(|e| self.skips(e.name()))
    }
}

/// Parse `html` fetched from `url` into a successful extraction record.
///
/// Missing fields are empty strings. `content` is the bounded concatenation
/// of title, h1, h2, meta description, and body text.
pub fn parse_document(html: &str, url: &str, opts: &ExtractOptions) -> ExtractionResult {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| normalize(&t.text().collect::<String>()))
        .unwrap_or_default();

    let meta_description = meta_content(&document, &META_DESCRIPTION)
        .or_else(|| meta_content(&document, &OG_DESCRIPTION))
        .unwrap_or_default();

    let headings = Headings { h1: heading_text(&document, &H1, opts), h2: heading_text(&document, &H2, opts) };

    let body = main_text(&document, opts);

    let content = combine(
        [title.as_str(), headings.h1.as_str(), headings.h2.as_str(), meta_description.as_str(), body.as_str()],
        opts.content_cap,
    );

    ExtractionResult {
        url: url.to_string(),
        title: bounded(&title, opts.content_cap),
        headings,
        meta_description,
        content,
        error: None,
        cached_at: None,
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|m| m.value().attr("content"))
        .map(normalize)
        .find(|s| !s.is_empty())
}

fn heading_text(document: &Html, selector: &Selector, opts: &ExtractOptions) -> String {
    let parts: Vec<String> = document
        .select(selector)
        .filter(|h| !opts.is_hidden(h))
        .map(|h| visible_text(h, opts))
        .filter(|s| !s.is_empty())
        .collect();
    normalize(&parts.join(" "))
}

/// Text of the outermost semantic containers, or the whole body when the page
/// has none with visible text.
fn main_text(document: &Html, opts: &ExtractOptions) -> String {
    let containers: Vec<ElementRef<'_>> = document.select(&CONTAINER).filter(|c| !opts.is_hidden(c)).collect();
    let ids: HashSet<_> = containers.iter().map(|c| c.id()).collect();

    let outermost = containers
        .iter()
        .filter(|c| !c.ancestors().any(|a| ids.contains(&a.id())))
        .map(|c| visible_text(*c, opts))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    if !outermost.is_empty() {
        return normalize(&outermost.join(" "));
    }

    match document.select(&BODY).next() {
        Some(body) => visible_text(body, opts),
        None => visible_text(document.root_element(), opts),
    }
}

/// Normalized text beneath `el`, skipping hidden subtrees.
fn visible_text(el: ElementRef<'_>, opts: &ExtractOptions) -> String {
    let mut out = String::new();
    collect_text(el, opts, &mut out);
    normalize(&out)
}

fn collect_text(el: ElementRef<'_>, opts: &ExtractOptions, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(e) if !opts.skips(e.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, opts, out);
                }
            }
            _ => {}
        }
    }
}
