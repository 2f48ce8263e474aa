//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-web-ground server.

pub mod cache;
pub mod web_ground;
pub mod web_retrieve;
pub mod web_search;

pub use web_ground::WebGroundParams;
pub use web_retrieve::WebRetrieveParams;
pub use web_search::WebSearchParams;
