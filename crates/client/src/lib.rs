//! Retrieval pipeline for webground.
//!
//! This crate provides strategy selection, static and browser-rendered
//! extraction, the cache-aside retriever, the search fallback, and message
//! grounding used by the server.

pub mod extract;
pub mod fetch;
pub mod ground;
pub mod render;
pub mod retrieve;
pub mod search;
pub mod strategy;

pub use extract::{ContentExtractor, DynamicExtractor, ExtractOptions, StaticExtractor};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, canonicalize, find_url};
pub use ground::{Grounder, Grounding};
#[cfg(feature = "render")]
pub use render::HeadlessRenderer;
pub use render::{RenderError, RenderOptions, RenderedPage, Renderer};
pub use retrieve::Retriever;
pub use search::{SearchFallback, SearchResult};
pub use strategy::{Strategy, StrategySelector};
