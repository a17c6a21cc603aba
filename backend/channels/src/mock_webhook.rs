//! In-process stand-in for a Google Chat incoming webhook.
//!
//! Records every POST so tests and manual runs can inspect exactly what
//! would have been delivered.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRequest {
    pub timestamp: DateTime<Utc>,
    pub body: Value,
    pub headers: RecordedHeaders,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedHeaders {
    #[serde(rename = "content-type")]
    pub content_type: Option<String>,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    sequence: Arc<AtomicU64>,
    started: Instant,
}

pub struct MockWebhookServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl MockWebhookServer {
    /// Bind `addr` (port 0 picks a free port) and serve in the background.
    pub async fn start(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding mock webhook to {addr}"))?;
        let addr = listener.local_addr()?;

        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(0)),
            started: Instant::now(),
        };
        let app = router(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                error!("Mock webhook server error: {}", e);
            }
        });

        info!(url = %format!("http://{addr}/webhook"), "Mock webhook server started");
        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Webhook URL to hand to a sender.
    pub fn url(&self) -> String {
        format!("http://{}/webhook", self.addr)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Drop every recorded request, returning how many there were.
    pub async fn clear(&self) -> usize {
        let mut requests = self.state.requests.lock().await;
        let cleared = requests.len();
        requests.clear();
        cleared
    }

    /// Dump recorded requests as pretty JSON.
    pub async fn save_requests(&self, path: &Path) -> Result<usize> {
        let requests = self.requests().await;
        let data = json!({
            "timestamp": Utc::now(),
            "count": requests.len(),
            "requests": requests,
        });
        tokio::fs::write(path, serde_json::to_vec_pretty(&data)?)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(requests.len())
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.handle.await.context("mock webhook task panicked")?;
        info!("Mock webhook server stopped");
        Ok(())
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/webhook", post(receive))
        .route("/health", get(health))
        .route("/requests", get(list_requests).delete(clear_requests))
        .with_state(state)
}

async fn receive(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let text = body.get("text").cloned().unwrap_or_else(|| json!(""));
    let recorded = RecordedRequest {
        timestamp: Utc::now(),
        body,
        headers: RecordedHeaders {
            content_type: header_value(header::CONTENT_TYPE),
            user_agent: header_value(header::USER_AGENT),
        },
    };

    let count = {
        let mut requests = state.requests.lock().await;
        requests.push(recorded);
        requests.len()
    };
    let seq = state.sequence.fetch_add(1, Ordering::SeqCst) + 1;
    info!(count, "Mock webhook received request");

    (
        StatusCode::OK,
        Json(json!({
            "name": format!("spaces/MOCK_SPACE/messages/MSG_{seq}"),
            "sender": { "name": "Mock Sender", "displayName": "Mock Bot" },
            "createTime": Utc::now(),
            "text": text,
        })),
    )
}

async fn health(State(state): State<MockState>) -> impl IntoResponse {
    let count = state.requests.lock().await.len();
    Json(json!({
        "status": "healthy",
        "requestCount": count,
        "uptimeSecs": state.started.elapsed().as_secs(),
    }))
}

async fn list_requests(State(state): State<MockState>) -> impl IntoResponse {
    let requests = state.requests.lock().await.clone();
    Json(json!({ "count": requests.len(), "requests": requests }))
}

async fn clear_requests(State(state): State<MockState>) -> impl IntoResponse {
    let cleared = {
        let mut requests = state.requests.lock().await;
        let cleared = requests.len();
        requests.clear();
        cleared
    };
    Json(json!({
        "cleared": cleared,
        "message": format!("Cleared {cleared} requests"),
    }))
}
