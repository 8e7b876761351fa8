// Embeddings Connector - OpenAI-compatible embeddings API
use crate::errors::{SearchError, SearchResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct EmbeddingsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl EmbeddingsClient {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<SecretString>,
        model: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    /// Generate the embedding vector for a single text
    pub async fn embed(&self, text: &str) -> SearchResult<Vec<f32>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(SearchError::MissingCredential("OPENAI_API_KEY"))?;

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(api_key.expose_secret())
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::from_response("embeddings", response).await);
        }

        let result: EmbedResponse = response.json().await?;
        let embedding = first_embedding(result)?;
        debug!(dimension = embedding.len(), model = %self.model, "Query embedded");
        Ok(embedding)
    }
}

fn first_embedding(response: EmbedResponse) -> SearchResult<Vec<f32>> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| SearchError::UnexpectedResponse {
            service: "embeddings",
            message: "no embedding in response".to_string(),
        })
}
