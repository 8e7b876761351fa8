//! Qdrant vector search connector
//!
//! Performs similarity search over the knowledge-base collection through the
//! Qdrant REST API.

use crate::{
    errors::{SearchError, SearchResult},
    search::SearchHit,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct QdrantClient {
    client: reqwest::Client,
    url: Option<String>,
    api_key: Option<SecretString>,
    collection: String,
}

#[derive(Debug, Serialize)]
struct PointsSearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    score_threshold: f64,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct PointsSearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    score: f64,
    #[serde(default)]
    payload: Option<Value>,
}

impl QdrantClient {
    pub fn new(
        client: reqwest::Client,
        url: Option<String>,
        api_key: Option<SecretString>,
        collection: &str,
    ) -> Self {
        Self {
            client,
            url: url.map(|u| u.trim_end_matches('/').to_string()),
            api_key,
            collection: collection.to_string(),
        }
    }

    fn search_url(&self, base: &str) -> String {
        format!("{}/collections/{}/points/search", base, self.collection)
    }

    /// Search for points similar to the query vector, best first
    pub async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
        score_threshold: f64,
    ) -> SearchResult<Vec<SearchHit>> {
        let base = self
            .url
            .as_deref()
            .ok_or(SearchError::MissingCredential("QDRANT_URL"))?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(SearchError::MissingCredential("QDRANT_API_KEY"))?;

        let request = PointsSearchRequest {
            vector: query_vector,
            limit,
            score_threshold,
            with_payload: true,
        };

        let response = self
            .client
            .post(self.search_url(base))
            .header("api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::from_response("qdrant", response).await);
        }

        let result: PointsSearchResponse = response.json().await?;
        Ok(into_hits(result, score_threshold))
    }
}

fn into_hits(response: PointsSearchResponse, score_threshold: f64) -> Vec<SearchHit> {
    response
        .result
        .into_iter()
        .filter(|point| point.score >= score_threshold)
        .map(|point| {
            let payload = point.payload.unwrap_or(Value::Null);
            SearchHit {
                question: payload_str(&payload, "question"),
                answer: payload_str(&payload, "answer"),
                product_description: payload_str(&payload, "product_description"),
                product_id: payload.get("product_id").filter(|v| !v.is_null()).cloned(),
                score: Some(point.score),
            }
        })
        .collect()
}

fn payload_str(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
