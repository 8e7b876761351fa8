// Search Schema - request-scoped records shared by every search strategy
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum hits requested from the vector index.
pub const VECTOR_RESULT_LIMIT: usize = 3;

/// Minimum similarity a vector hit needs to count as an answer.
pub const SCORE_THRESHOLD: f64 = 0.5;

/// Maximum rows requested from the keyword store.
pub const KEYWORD_ROW_LIMIT: usize = 3;

/// A single knowledge-base entry, normalized across the vector index and the keyword store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>, // "P1" | 42, kept as stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,        // vector hits only
}

/// Which strategy produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Vector,
    Keyword,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Vector => "vector",
            AnswerSource::Keyword => "keyword",
        }
    }
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerResult {
    Found { source: AnswerSource, hit: SearchHit },
    NotFound,
    MissingQuery,
}
