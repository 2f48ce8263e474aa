//! Content extraction.
//!
//! ### Extractors
//! - [`StaticExtractor`]: HTTP fetch, then parse the response HTML.
//! - [`DynamicExtractor`]: render in a headless browser, then parse the live DOM.
//!
//! Both implement [`ContentExtractor`] and share the field rules in [`html`].
//!
//! ### Failure Contract
//! - `extract` never returns `Err` and never panics on bad input.
//! - Network, render, and parse failures become records with `error` set and
//!   the diagnostic repeated in `content`.

pub mod fetched;
pub mod html;
pub mod normalize;
pub mod rendered;

pub use fetched::StaticExtractor;
pub use html::{ExtractOptions, parse_document};
pub use normalize::{bounded, combine, normalize};
pub use rendered::DynamicExtractor;

use webground_core::ExtractionResult;

/// Stable extractor trait.
///
/// The orchestrator dispatches on [`crate::Strategy`] to one of these without
/// knowing how the HTML was obtained.
#[async_trait::async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extract structured fields from `url`. Failures are encoded in the record.
    async fn extract(&self, url: &str) -> ExtractionResult;
}
