// Outbound Connectors - clients for the embeddings, vector and text-search backends
pub mod embeddings;
pub mod postgres;
pub mod qdrant;
pub mod supabase;

pub use embeddings::EmbeddingsClient;
pub use postgres::PostgresTextSearch;
pub use qdrant::QdrantClient;
pub use supabase::SupabaseClient;

use crate::errors::{SearchError, SearchResult};

/// Text columns matched by keyword search.
pub const KEYWORD_COLUMNS: &[&str] = &["question", "answer", "product_description"];

/// Escapes LIKE/ILIKE wildcards so the needle matches literally (escape char `\`).
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Accepts `table` or `schema.table` made of ASCII alphanumerics and underscores.
pub fn validate_identifier(name: &str) -> SearchResult<()> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|&p| valid_part(p)) {
        Ok(())
    } else {
        Err(SearchError::InvalidConfig(format!(
            "invalid table name: {name:?}"
        )))
    }
}
