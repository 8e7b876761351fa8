// Search Error Types
use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

/// Longest backend response body kept inside an error.
const BODY_SNIPPET_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("{service} returned {status}: {body}")]
    Backend {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unexpected response from {service}: {message}")]
    UnexpectedResponse {
        service: &'static str,
        message: String,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Turns a non-2xx response into a `Backend` error, keeping a short body snippet.
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SearchError::Backend {
            service,
            status,
            body: snippet(&body),
        }
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
