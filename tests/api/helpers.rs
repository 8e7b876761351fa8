use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use knowledge_search::{config::LogFormat, telemetry, Application, ServiceConfig};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

pub const OPENAI_KEY: &str = "test-openai-key";
pub const QDRANT_KEY: &str = "test-qdrant-key";
pub const SUPABASE_KEY: &str = "test-supabase-key";
pub const COLLECTION: &str = "knowledge_base";
pub const TABLE: &str = "knowledge_base";

// Tracing is installed once per test binary; set TEST_LOG to see the output
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        telemetry::init_tracing(LogFormat::Pretty, "debug");
    }
});

/// Canned answer for one mocked backend endpoint
#[derive(Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: Value,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "error": "mock failure" }),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(&self) -> HttpResponse {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let status = StatusCode::from_u16(self.status).expect("valid mock status");
        HttpResponse::build(status).json(&self.body)
    }
}

pub struct BackendReplies {
    pub embeddings: MockReply,
    pub qdrant: MockReply,
    pub supabase: MockReply,
}

impl Default for BackendReplies {
    fn default() -> Self {
        Self {
            embeddings: MockReply::ok(embedding_body()),
            qdrant: MockReply::ok(json!({ "result": [], "status": "ok", "time": 0.001 })),
            supabase: MockReply::ok(json!([])),
        }
    }
}

pub fn embedding_body() -> Value {
    json!({
        "object": "list",
        "data": [{ "object": "embedding", "index": 0, "embedding": [0.12, -0.03, 0.88] }],
        "model": "text-embedding-3-small"
    })
}

/// Shared state of the mock backend: replies plus call bookkeeping
pub struct MockBackend {
    replies: BackendReplies,
    embeddings_calls: AtomicUsize,
    qdrant_calls: AtomicUsize,
    supabase_calls: AtomicUsize,
    supabase_filters: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn embeddings_calls(&self) -> usize {
        self.embeddings_calls.load(Ordering::SeqCst)
    }

    pub fn qdrant_calls(&self) -> usize {
        self.qdrant_calls.load(Ordering::SeqCst)
    }

    pub fn supabase_calls(&self) -> usize {
        self.supabase_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.embeddings_calls() + self.qdrant_calls() + self.supabase_calls()
    }

    /// Decoded `or` filters received by the PostgREST mock
    pub fn supabase_filters(&self) -> Vec<String> {
        self.supabase_filters.lock().unwrap().clone()
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

async fn mock_embeddings(req: HttpRequest, backend: web::Data<MockBackend>) -> HttpResponse {
    backend.embeddings_calls.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {OPENAI_KEY}");
    if header(&req, "authorization") != Some(expected.as_str()) {
        return HttpResponse::Unauthorized().finish();
    }
    backend.replies.embeddings.respond().await
}

async fn mock_qdrant(req: HttpRequest, backend: web::Data<MockBackend>) -> HttpResponse {
    backend.qdrant_calls.fetch_add(1, Ordering::SeqCst);
    if header(&req, "api-key") != Some(QDRANT_KEY) {
        return HttpResponse::Unauthorized().finish();
    }
    backend.replies.qdrant.respond().await
}

async fn mock_supabase(
    req: HttpRequest,
    params: web::Query<HashMap<String, String>>,
    backend: web::Data<MockBackend>,
) -> HttpResponse {
    backend.supabase_calls.fetch_add(1, Ordering::SeqCst);
    if header(&req, "apikey") != Some(SUPABASE_KEY) {
        return HttpResponse::Unauthorized().finish();
    }
    if let Some(filter) = params.get("or") {
        backend.supabase_filters.lock().unwrap().push(filter.clone());
    }
    backend.replies.supabase.respond().await
}

pub struct TestApp {
    pub address: String,
    pub backend: web::Data<MockBackend>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn search_url(&self) -> String {
        format!("{}/api/search", self.address)
    }

    pub async fn post_search(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.search_url())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(self.search_url())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Starts the mock backend on a random port
fn spawn_backend(replies: BackendReplies) -> (String, web::Data<MockBackend>) {
    let backend = web::Data::new(MockBackend {
        replies,
        embeddings_calls: AtomicUsize::new(0),
        qdrant_calls: AtomicUsize::new(0),
        supabase_calls: AtomicUsize::new(0),
        supabase_filters: Mutex::new(Vec::new()),
    });

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock backend");
    let port = listener.local_addr().unwrap().port();

    let state = backend.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/v1/embeddings", web::post().to(mock_embeddings))
            .route(
                "/collections/{collection}/points/search",
                web::post().to(mock_qdrant),
            )
            .route("/rest/v1/{table}", web::get().to(mock_supabase))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on mock backend")
    .run();
    let _ = tokio::spawn(server);

    (format!("http://127.0.0.1:{port}"), backend)
}

pub async fn spawn_app(replies: BackendReplies) -> TestApp {
    spawn_app_with(replies, |_| {}).await
}

/// Launches the service against the mock backend; `tweak` can override any variable.
pub async fn spawn_app_with<F>(replies: BackendReplies, tweak: F) -> TestApp
where
    F: FnOnce(&mut HashMap<&'static str, String>),
{
    Lazy::force(&TRACING);

    let (backend_url, backend) = spawn_backend(replies);

    let mut vars: HashMap<&'static str, String> = HashMap::from([
        ("HOST", "127.0.0.1".to_string()),
        ("PORT", "0".to_string()),
        ("OPENAI_API_KEY", OPENAI_KEY.to_string()),
        ("OPENAI_BASE_URL", backend_url.clone()),
        ("QDRANT_URL", backend_url.clone()),
        ("QDRANT_API_KEY", QDRANT_KEY.to_string()),
        ("QDRANT_COLLECTION", COLLECTION.to_string()),
        ("SUPABASE_URL", backend_url),
        ("SUPABASE_KEY", SUPABASE_KEY.to_string()),
        ("KNOWLEDGE_TABLE", TABLE.to_string()),
        ("REQUEST_TIMEOUT_SECS", "1".to_string()),
    ]);
    tweak(&mut vars);

    let config = ServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to read configuration.");
    let application = Application::build(config)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        backend,
        client: reqwest::Client::new(),
    }
}
