// Knowledge Search Service - webhook that answers a query from the knowledge base
// Vector similarity search first, keyword text search as the fallback

pub mod api;
pub mod config;
pub mod connectors;
pub mod errors;
pub mod search;
pub mod startup;
pub mod telemetry;

pub use config::ServiceConfig;
pub use errors::{SearchError, SearchResult};
pub use search::QueryResolver;
pub use startup::Application;
