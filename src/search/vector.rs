// Vector Search Strategy - embed the query, then similarity search in Qdrant
use super::{
    service_trait::SearchStrategy, AnswerSource, SearchHit, SCORE_THRESHOLD, VECTOR_RESULT_LIMIT,
};
use crate::{
    connectors::{EmbeddingsClient, QdrantClient},
    errors::SearchResult,
};
use async_trait::async_trait;
use tracing::debug;

pub struct VectorSearchService {
    embeddings: EmbeddingsClient,
    index: QdrantClient,
}

impl VectorSearchService {
    pub fn new(embeddings: EmbeddingsClient, index: QdrantClient) -> Self {
        Self { embeddings, index }
    }
}

#[async_trait]
impl SearchStrategy for VectorSearchService {
    fn source(&self) -> AnswerSource {
        AnswerSource::Vector
    }

    async fn search(&self, query: &str) -> SearchResult<Option<SearchHit>> {
        let embedding = self.embeddings.embed(query).await?;
        let hits = self
            .index
            .search(&embedding, VECTOR_RESULT_LIMIT, SCORE_THRESHOLD)
            .await?;

        debug!(hits = hits.len(), "Vector search completed");
        Ok(top_hit(hits))
    }
}

/// Picks the highest-scoring hit, ignoring hits without a score.
pub fn top_hit(hits: Vec<SearchHit>) -> Option<SearchHit> {
    hits.into_iter()
        .filter(|h| h.score.is_some())
        .max_by(|a, b| {
            a.score
                .unwrap_or_default()
                .total_cmp(&b.score.unwrap_or_default())
        })
}
