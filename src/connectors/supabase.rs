//! Supabase (PostgREST) keyword search connector
//!
//! Runs a case-insensitive substring match over the knowledge-base table.
//! The `or` filter is assembled by [`OrIlikeFilter`], which quotes and
//! LIKE-escapes the user query; URL encoding is left to reqwest.

use super::{escape_like, validate_identifier, KEYWORD_COLUMNS};
use crate::{
    errors::{SearchError, SearchResult},
    search::SearchHit,
};
use secrecy::{ExposeSecret, SecretString};

pub struct SupabaseClient {
    client: reqwest::Client,
    url: Option<String>,
    api_key: Option<SecretString>,
    table: String,
}

/// `(col.ilike."*needle*",...)` with the needle quoted for PostgREST.
#[derive(Debug, Clone, PartialEq)]
pub struct OrIlikeFilter {
    columns: Vec<String>,
    pattern: String,
}

impl OrIlikeFilter {
    pub fn contains(columns: &[&str], needle: &str) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            pattern: format!("*{}*", postgrest_like(needle)),
        }
    }

    pub fn to_query_value(&self) -> String {
        let quoted = quote_value(&self.pattern);
        let conditions: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("{column}.ilike.{quoted}"))
            .collect();
        format!("({})", conditions.join(","))
    }
}

/// LIKE-escapes the needle for PostgREST, which reads every `*` as `%` and
/// has no escape for it. A `*` becomes `_` so it stands for exactly one
/// character, which still matches a literal `*`.
fn postgrest_like(needle: &str) -> String {
    escape_like(needle).replace('*', "_")
}

/// Double-quotes a PostgREST filter value so reserved characters stay literal.
fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

impl SupabaseClient {
    pub fn new(
        client: reqwest::Client,
        url: Option<String>,
        api_key: Option<SecretString>,
        table: &str,
    ) -> SearchResult<Self> {
        validate_identifier(table)?;
        Ok(Self {
            client,
            url: url.map(|u| u.trim_end_matches('/').to_string()),
            api_key,
            table: table.to_string(),
        })
    }

    fn table_url(&self, base: &str) -> String {
        format!("{}/rest/v1/{}", base, self.table)
    }

    /// Rows where `needle` appears in any keyword column, in table order
    pub async fn search_text(&self, needle: &str, limit: usize) -> SearchResult<Vec<SearchHit>> {
        let base = self
            .url
            .as_deref()
            .ok_or(SearchError::MissingCredential("SUPABASE_URL"))?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(SearchError::MissingCredential("SUPABASE_KEY"))?;

        let or_filter = OrIlikeFilter::contains(KEYWORD_COLUMNS, needle).to_query_value();
        let limit = limit.to_string();

        let response = self
            .client
            .get(self.table_url(base))
            .header("apikey", api_key.expose_secret())
            .bearer_auth(api_key.expose_secret())
            .query(&[
                ("select", "*"),
                ("or", or_filter.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::from_response("supabase", response).await);
        }

        Ok(response.json().await?)
    }
}
