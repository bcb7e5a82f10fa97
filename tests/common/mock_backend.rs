use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted state shared between a test and its mock analysis server.
#[derive(Default)]
pub struct MockState {
    /// Status to answer `POST /run` with.
    pub run_status: Option<StatusCode>,
    /// Bodies received on `POST /run`.
    pub submissions: Vec<Value>,
    /// Progress replies, consumed in order. The last one repeats.
    pub progress: VecDeque<Value>,
    pub progress_calls: u32,
    pub results: Value,
    /// Files served under `/static/`.
    pub images: Vec<(String, Vec<u8>)>,
}

pub type SharedState = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl MockBackend {
    /// Start a mock server on an ephemeral port.
    pub async fn start(progress: Vec<Value>, results: Value) -> Self {
        let state = Arc::new(Mutex::new(MockState {
            progress: progress.into(),
            results,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/run", post(run))
            .route("/progress", get(progress_handler))
            .route("/results", get(results_handler))
            .route("/static/*path", get(static_file))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = self.state.lock().expect("Mock state poisoned");
        f(&mut guard)
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.with(|s| s.submissions.clone())
    }

    pub fn progress_calls(&self) -> u32 {
        self.with(|s| s.progress_calls)
    }
}

async fn run(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("Mock state poisoned");
    state.submissions.push(body);
    match state.run_status {
        Some(status) => (status, "analysis worker unavailable").into_response(),
        None => Json(serde_json::json!({"status": "started"})).into_response(),
    }
}

async fn progress_handler(State(state): State<SharedState>) -> Json<Value> {
    let mut state = state.lock().expect("Mock state poisoned");
    state.progress_calls += 1;
    let reply = if state.progress.len() > 1 {
        state.progress.pop_front()
    } else {
        state.progress.front().cloned()
    };
    Json(reply.unwrap_or(Value::Null))
}

async fn results_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(state.lock().expect("Mock state poisoned").results.clone())
}

async fn static_file(State(state): State<SharedState>, Path(path): Path<String>) -> Response {
    let state = state.lock().expect("Mock state poisoned");
    match state.images.iter().find(|(name, _)| *name == path) {
        Some((_, bytes)) => (StatusCode::OK, bytes.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
