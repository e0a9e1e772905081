//! Shared helpers for API integration tests.
//!
//! Tests run the real application router (same middleware stack as
//! production) against an in-process stub of the generation provider
//! bound to an ephemeral port, so the full submit -> poll -> relay path
//! is exercised without a network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Request, Response, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vidgate_api::config::ServerConfig;
use vidgate_api::router::build_app_router;
use vidgate_api::scheduler::PollScheduler;
use vidgate_api::state::AppState;
use vidgate_api::store::JobStore;
use vidgate_provider::{ProviderConfig, VideoApi};

/// Fast poll interval so lifecycle tests finish quickly.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        poll_interval_ms: TEST_POLL_INTERVAL.as_millis() as u64,
    }
}

// ---------------------------------------------------------------------------
// Provider stub
// ---------------------------------------------------------------------------

/// Programmable body for `GET /videos/{id}/content`.
pub struct ContentResponse {
    pub status: u16,
    /// Header name/value pairs set on the response.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for ContentResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".into(), "video/mp4".into())],
            body: b"fake video bytes".to_vec(),
        }
    }
}

/// Shared state of the provider stub, inspectable from tests.
pub struct StubState {
    /// Response to `POST /videos`.
    pub create: Mutex<(u16, serde_json::Value)>,
    /// Queue of `GET /videos/{id}` responses; the last entry repeats.
    pub status: Mutex<Vec<(u16, serde_json::Value)>>,
    /// Response to `GET /videos/{id}/content`.
    pub content: Mutex<ContentResponse>,
    /// `Range` header captured from the most recent content request.
    pub last_range: Mutex<Option<String>>,
    pub create_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            create: Mutex::new((
                200,
                serde_json::json!({"id": "video_123", "status": "queued"}),
            )),
            status: Mutex::new(vec![(200, serde_json::json!({"status": "queued"}))]),
            content: Mutex::new(ContentResponse::default()),
            last_range: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
        }
    }
}

/// A running provider stub.
pub struct ProviderStub {
    pub base_url: String,
    pub state: Arc<StubState>,
}

async fn stub_create(
    State(state): State<Arc<StubState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.create_calls.fetch_add(1, Ordering::SeqCst);
    let (status, payload) = state.create.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap(), Json(payload))
}

async fn stub_status(
    State(state): State<Arc<StubState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.status_calls.fetch_add(1, Ordering::SeqCst);
    let mut queue = state.status.lock().unwrap();
    let (status, payload) = if queue.len() > 1 {
        queue.remove(0)
    } else {
        queue[0].clone()
    };
    (StatusCode::from_u16(status).unwrap(), Json(payload))
}

async fn stub_content(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response<Body> {
    state.content_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_range.lock().unwrap() = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let content = state.content.lock().unwrap();
    let mut builder = Response::builder().status(content.status);
    for (name, value) in &content.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::from(content.body.clone())).unwrap()
}

/// Spawn the provider stub on an ephemeral port.
pub async fn spawn_provider_stub() -> ProviderStub {
    let state = Arc::new(StubState::default());
    let app = Router::new()
        .route("/videos", post(stub_create))
        .route("/videos/{id}", get(stub_status))
        .route("/videos/{id}/content", get(stub_content))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ProviderStub {
        base_url: format!("http://{addr}"),
        state,
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router against the given provider, with all
/// production middleware. Also returns the state so tests can inspect the
/// store and scheduler directly.
pub fn build_test_app(provider_url: &str, api_key: Option<&str>) -> (Router, AppState) {
    let config = test_config();

    let provider = Arc::new(VideoApi::new(ProviderConfig {
        base_url: provider_url.to_string(),
        api_key: api_key.map(String::from),
    }));
    let store = Arc::new(JobStore::new());
    let scheduler = PollScheduler::new(Arc::clone(&store), Arc::clone(&provider), TEST_POLL_INTERVAL);

    let state = AppState {
        config: Arc::new(config.clone()),
        provider,
        store,
        scheduler,
    };

    (build_app_router(state.clone(), &config), state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request against the app.
pub async fn get_uri(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a GET request with extra headers.
pub async fn get_with_headers(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Issue a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
