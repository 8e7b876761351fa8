//! Search webhook endpoint
//!
//! Accepts `{"query": "..."}` or `{"args": {"query": "..."}}` and answers with
//! the first hit the [`QueryResolver`] finds.

use actix_web::{
    dev::ServiceResponse, http::StatusCode, middleware::ErrorHandlerResponse, web, HttpRequest,
    HttpResponse, Resource,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::search::{AnswerResult, AnswerSource, QueryResolver, SearchHit};

pub const NO_QUERY_MESSAGE: &str = "No query provided";
pub const NOT_FOUND_MESSAGE: &str = "No relevant information found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Webhook response body
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AnswerSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn found(source: AnswerSource, hit: SearchHit) -> Self {
        Self {
            success: true,
            source: Some(source),
            data: Some(hit),
            message: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            source: None,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Pulls the query out of either accepted body shape.
///
/// A non-empty `args.query` wins over `query`. An empty body or a JSON value
/// without a string query yields `None`; only unparsable JSON is an error.
pub fn extract_query(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)?;
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
    };

    Ok(non_empty(value.get("args").and_then(|args| args.get("query")))
        .or_else(|| non_empty(value.get("query"))))
}

fn answer_to_response(result: AnswerResult) -> HttpResponse {
    match result {
        AnswerResult::Found { source, hit } => {
            HttpResponse::Ok().json(SearchResponse::found(source, hit))
        }
        AnswerResult::NotFound => HttpResponse::Ok().json(SearchResponse::failure(NOT_FOUND_MESSAGE)),
        AnswerResult::MissingQuery => {
            HttpResponse::BadRequest().json(SearchResponse::failure(NO_QUERY_MESSAGE))
        }
    }
}

/// POST handler: validate, resolve, shape the response
#[tracing::instrument(name = "Search webhook", skip(body, resolver))]
pub async fn search(body: web::Bytes, resolver: web::Data<QueryResolver>) -> HttpResponse {
    let query = match extract_query(&body) {
        Ok(Some(query)) => query,
        Ok(None) => return answer_to_response(AnswerResult::MissingQuery),
        Err(e) => {
            error!(error = %e, "Malformed request body");
            return HttpResponse::InternalServerError()
                .json(SearchResponse::failure(INTERNAL_ERROR_MESSAGE));
        }
    };

    let start = std::time::Instant::now();
    let result = resolver.resolve(&query).await;

    info!(
        found = matches!(result, AnswerResult::Found { .. }),
        time_ms = start.elapsed().as_millis() as u64,
        "Search request completed"
    );

    answer_to_response(result)
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    info!(method = %req.method(), path = req.path(), "Rejected non-POST request");
    HttpResponse::build(StatusCode::METHOD_NOT_ALLOWED).json(ErrorResponse {
        error: "Method not allowed".to_string(),
    })
}

/// Bodies over the payload limit are rejected by the extractor before the
/// handler runs; answer them with the same envelope as any other bad body.
pub fn payload_too_large<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    error!(path = res.request().path(), "Request body over the payload limit");
    let (req, _) = res.into_parts();
    let response =
        HttpResponse::InternalServerError().json(SearchResponse::failure(INTERNAL_ERROR_MESSAGE));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

/// Health check endpoint
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "knowledge-search",
    }))
}

fn search_resource(path: &str) -> Resource {
    web::resource(path)
        .route(web::post().to(search))
        .default_service(web::to(method_not_allowed))
}

/// Register search routes
pub fn search_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(search_resource("/api/search"))
        .service(search_resource("/search"))
        .route("/health", web::get().to(health));
}
