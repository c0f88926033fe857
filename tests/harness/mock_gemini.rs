//! Mock Gemini backend for integration tests
//!
//! Implements just enough of `models/{model}:generateContent` to return
//! canned images, no images, or an error status.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{routing, Json, Router};
use serde_json::{json, Value};
use tokio::sync::watch;

/// 1x1 transparent PNG
pub const PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// What the mock answers with
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// One PNG image plus a text part
    Image,
    /// Only a text part
    NoImages,
    /// The given HTTP status with an error body
    Fail(u16),
}

struct MockState {
    behavior: Behavior,
    request_count: AtomicU32,
    last_request: Mutex<Option<Value>>,
    last_api_key: Mutex<Option<String>>,
    last_model: Mutex<Option<String>>,
}

/// Mock Gemini server bound to a random local port
pub struct MockGemini {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: watch::Sender<bool>,
}

impl MockGemini {
    /// Start the mock server, returning immediately
    pub async fn start(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            request_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            last_api_key: Mutex::new(None),
            last_model: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1beta/models/{model_action}", routing::post(generate_content))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.changed().await.ok();
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx,
        })
    }

    /// Base URL to configure as the provider endpoint
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of generateContent requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Body of the most recent request
    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// `x-goog-api-key` header of the most recent request
    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }

    /// Model path segment of the most recent request
    pub fn last_model(&self) -> Option<String> {
        self.state.last_model.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn generate_content(
    State(state): State<Arc<MockState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(body);
    *state.last_api_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_model.lock().unwrap() = Some(model_action);

    match state.behavior {
        Behavior::Image => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            { "text": "Here is your image." },
                            { "inlineData": { "mimeType": "image/png", "data": PNG_B64 } }
                        ]
                    }
                }]
            })),
        ),
        Behavior::NoImages => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "I can't draw that." }] }
                }]
            })),
        ),
        Behavior::Fail(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({ "error": { "code": code, "message": "mock failure" } })),
        ),
    }
}
