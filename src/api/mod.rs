//! HTTP surface of the service
//!
//! One webhook endpoint for search plus a health check.

pub mod search;

pub use search::{payload_too_large, search_routes, SearchResponse};
