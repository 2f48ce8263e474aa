//! Cache layer for extraction results.
//!
//! - [`KvStore`]: string key-value store with per-key TTL
//! - [`CacheDb`]: SQLite implementation (tokio-rusqlite, WAL mode, versioned schema)
//! - [`MemoryStore`]: in-process implementation with an injectable clock
//! - [`ContentCache`]: record validation, size admission, and TTL on top of a store

pub mod connection;
pub mod content;
pub mod key;
pub mod memory;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use content::{CacheConfig, CacheWrite, ContentCache};
pub use key::cache_key;
pub use memory::MemoryStore;
pub use store::KvStore;
