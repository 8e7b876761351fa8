// Search Strategy Trait - Common interface for every fallback tier
use crate::{errors::SearchResult, search::{AnswerSource, SearchHit}};
use async_trait::async_trait;

#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Attribution reported to the caller when this strategy answers
    fn source(&self) -> AnswerSource;

    /// Strategy identifier used in logs (vector, keyword, ...)
    fn id(&self) -> &'static str {
        self.source().as_str()
    }

    /// Best hit for `query`, `Ok(None)` when the backend had nothing relevant.
    async fn search(&self, query: &str) -> SearchResult<Option<SearchHit>>;
}
