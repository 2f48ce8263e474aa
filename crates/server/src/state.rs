//! Shared pipeline handles for tool implementations.

use std::sync::Arc;

use webground_client::{Grounder, Retriever, SearchFallback};
use webground_core::CacheDb;

/// Everything a tool call needs, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: CacheDb,
    pub retriever: Arc<Retriever>,
    /// `None` when rendering is disabled or unavailable.
    pub search: Option<SearchFallback>,
    pub grounder: Grounder,
}

impl AppState {
    pub fn new(db: CacheDb, retriever: Arc<Retriever>, search: Option<SearchFallback>) -> Self {
        let grounder = Grounder::new(retriever.clone(), search.clone());
        Self { db, retriever, search, grounder }
    }
}
