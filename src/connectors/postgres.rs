//! Direct Postgres keyword search connector
//!
//! Used instead of the Supabase REST endpoint when `DATABASE_URL` is set.
//! The needle is always a bound parameter; only the validated table name is
//! spliced into the statement.

use super::{escape_like, validate_identifier, KEYWORD_COLUMNS};
use crate::{
    errors::{SearchError, SearchResult},
    search::SearchHit,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    types::Json,
    Postgres, QueryBuilder,
};
use std::time::Duration;

#[derive(Clone)]
pub struct PostgresTextSearch {
    pool: PgPool,
    table: String,
}

#[derive(Debug, sqlx::FromRow)]
struct KnowledgeRow {
    entry: Json<Value>,
}

impl PostgresTextSearch {
    /// Builds a lazy pool; no connection is attempted until the first search.
    pub fn connect_lazy(database_url: &SecretString, table: &str) -> SearchResult<Self> {
        validate_identifier(table)?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy(database_url.expose_secret())?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub async fn search_text(&self, needle: &str, limit: usize) -> SearchResult<Vec<SearchHit>> {
        let mut query = build_search_query(&self.table, needle, limit);
        let rows = query
            .build_query_as::<KnowledgeRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|r| serde_json::from_value(r.entry.0).map_err(SearchError::from))
            .collect()
    }
}

fn build_search_query<'a>(table: &str, needle: &str, limit: usize) -> QueryBuilder<'a, Postgres> {
    let pattern = format!("%{}%", escape_like(needle));

    let mut query = QueryBuilder::new("SELECT to_jsonb(kb) AS entry FROM ");
    query.push(table).push(" AS kb WHERE ");
    for (i, column) in KEYWORD_COLUMNS.iter().enumerate() {
        if i > 0 {
            query.push(" OR ");
        }
        query
            .push(format!("kb.{column} ILIKE "))
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\'");
    }
    query.push(" LIMIT ").push_bind(limit as i64);
    query
}
