// Search Module - ordered fallback over vector and keyword search
pub mod keyword;
pub mod resolver;
pub mod schema;
pub mod service_trait;
pub mod vector;

pub use resolver::QueryResolver;
pub use schema::*;
pub use service_trait::SearchStrategy;

pub use keyword::{KeywordSearchService, TextStore};
pub use vector::VectorSearchService;
