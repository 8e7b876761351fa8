// Knowledge Search Service Configuration
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,

    // Embedding service (OpenAI-compatible)
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub embedding_model: String,

    // Qdrant vector index
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<SecretString>,
    pub qdrant_collection: String,

    // Relational store: Supabase REST by default, direct Postgres when a URL is given
    pub supabase_url: Option<String>,
    pub supabase_key: Option<SecretString>,
    pub database_url: Option<SecretString>,
    pub knowledge_table: String,

    // Unset leaves the HTTP client on its transport defaults
    pub request_timeout_secs: Option<u64>,

    pub log_format: LogFormat,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| get(key).map(SecretString::new);

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => 3000,
        };

        let request_timeout_secs = get("REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("REQUEST_TIMEOUT_SECS must be an integer, got {raw:?}"))
            })
            .transpose()?;

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,

            openai_api_key: secret("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),

            qdrant_url: get("QDRANT_URL"),
            qdrant_api_key: secret("QDRANT_API_KEY"),
            qdrant_collection: get("QDRANT_COLLECTION")
                .unwrap_or_else(|| "knowledge_base".to_string()),

            supabase_url: get("SUPABASE_URL"),
            supabase_key: secret("SUPABASE_KEY"),
            database_url: secret("DATABASE_URL"),
            knowledge_table: get("KNOWLEDGE_TABLE")
                .unwrap_or_else(|| "knowledge_base".to_string()),

            request_timeout_secs,
            log_format,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Shared outbound HTTP client for every backend.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
