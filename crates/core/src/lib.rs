//! Core types and shared functionality for webground.
//!
//! This crate provides:
//! - The `ExtractionResult` record
//! - Cache layer (KV store abstraction, SQLite and in-memory stores, content cache)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod record;

pub use cache::{CacheConfig, CacheDb, CacheWrite, ContentCache, KvStore, MemoryStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use record::{ExtractionResult, Headings};
