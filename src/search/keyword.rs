// Keyword Search Strategy - case-insensitive substring match in the relational store
use super::{service_trait::SearchStrategy, AnswerSource, SearchHit, KEYWORD_ROW_LIMIT};
use crate::{
    connectors::{PostgresTextSearch, SupabaseClient},
    errors::SearchResult,
};
use async_trait::async_trait;
use tracing::debug;

/// Where keyword rows come from.
pub enum TextStore {
    Supabase(SupabaseClient),
    Postgres(PostgresTextSearch),
}

impl TextStore {
    fn name(&self) -> &'static str {
        match self {
            TextStore::Supabase(_) => "supabase",
            TextStore::Postgres(_) => "postgres",
        }
    }

    async fn search_text(&self, needle: &str, limit: usize) -> SearchResult<Vec<SearchHit>> {
        match self {
            TextStore::Supabase(client) => client.search_text(needle, limit).await,
            TextStore::Postgres(store) => store.search_text(needle, limit).await,
        }
    }
}

pub struct KeywordSearchService {
    store: TextStore,
}

impl KeywordSearchService {
    pub fn new(store: TextStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SearchStrategy for KeywordSearchService {
    fn source(&self) -> AnswerSource {
        AnswerSource::Keyword
    }

    async fn search(&self, query: &str) -> SearchResult<Option<SearchHit>> {
        let rows = self.store.search_text(query, KEYWORD_ROW_LIMIT).await?;
        debug!(store = self.store.name(), rows = rows.len(), "Keyword search completed");

        // Keyword matches are unranked, the first row wins. Only the text
        // columns are reported.
        Ok(rows.into_iter().next().map(|row| SearchHit {
            score: None,
            product_id: None,
            ..row
        }))
    }
}
