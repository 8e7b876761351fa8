// Query Resolver - walks the search strategies in order until one answers
use super::{
    keyword::{KeywordSearchService, TextStore},
    service_trait::SearchStrategy,
    vector::VectorSearchService,
};
use crate::{
    config::ServiceConfig,
    connectors::{EmbeddingsClient, PostgresTextSearch, QdrantClient, SupabaseClient},
    search::AnswerResult,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct QueryResolver {
    strategies: Vec<Arc<dyn SearchStrategy>>,
}

impl QueryResolver {
    /// Strategies are tried in the given order; each runs at most once per query.
    pub fn new(strategies: Vec<Arc<dyn SearchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Vector search first, keyword search second, wired from configuration.
    ///
    /// Missing credentials are not an error here: the affected strategy fails
    /// at call time and the resolver falls through to the next one.
    pub fn from_config(config: ServiceConfig) -> anyhow::Result<Self> {
        let client = config.http_client()?;

        let embeddings = EmbeddingsClient::new(
            client.clone(),
            &config.openai_base_url,
            config.openai_api_key,
            &config.embedding_model,
        );
        let index = QdrantClient::new(
            client.clone(),
            config.qdrant_url,
            config.qdrant_api_key,
            &config.qdrant_collection,
        );

        let store = match &config.database_url {
            Some(database_url) => TextStore::Postgres(PostgresTextSearch::connect_lazy(
                database_url,
                &config.knowledge_table,
            )?),
            None => TextStore::Supabase(SupabaseClient::new(
                client,
                config.supabase_url,
                config.supabase_key,
                &config.knowledge_table,
            )?),
        };

        let strategies: Vec<Arc<dyn SearchStrategy>> = vec![
            Arc::new(VectorSearchService::new(embeddings, index)),
            Arc::new(KeywordSearchService::new(store)),
        ];
        Ok(Self::new(strategies))
    }

    pub fn strategy_ids(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// Resolve a query to the first usable hit.
    ///
    /// Backend failures are logged and treated like an empty result, so the
    /// caller only ever sees `Found`, `NotFound` or `MissingQuery`.
    #[tracing::instrument(name = "Resolving query", skip(self))]
    pub async fn resolve(&self, query: &str) -> AnswerResult {
        let query = query.trim();
        if query.is_empty() {
            return AnswerResult::MissingQuery;
        }

        for strategy in &self.strategies {
            debug!(strategy = strategy.id(), "Trying search strategy");

            match strategy.search(query).await {
                Ok(Some(hit)) => {
                    info!(strategy = strategy.id(), score = ?hit.score, "Query answered");
                    return AnswerResult::Found {
                        source: strategy.source(),
                        hit,
                    };
                }
                Ok(None) => {
                    debug!(strategy = strategy.id(), "No results, falling back");
                }
                Err(e) => {
                    warn!(strategy = strategy.id(), error = %e, "Search strategy failed, falling back");
                }
            }
        }

        info!("No relevant information found");
        AnswerResult::NotFound
    }
}
