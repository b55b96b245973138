#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use feddit_pulse::config::{ClassifierConfig, FedditConfig};

/// How the fake Feddit answers its comment listing.
#[derive(Clone, Copy, PartialEq)]
pub enum FedditMode {
    Normal,
    MalformedComments,
    FailingComments,
}

#[derive(Clone)]
pub struct FedditFixture {
    pub subfeddits: Arc<Vec<Value>>,
    pub comments: Arc<Vec<Value>>,
    pub mode: FedditMode,
    pub hits: Arc<AtomicUsize>,
}

impl FedditFixture {
    pub fn new(subfeddits: Vec<Value>, comments: Vec<Value>) -> Self {
        Self {
            subfeddits: Arc::new(subfeddits),
            comments: Arc::new(comments),
            mode: FedditMode::Normal,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_mode(mut self, mode: FedditMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn subfeddit(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "username": "admin",
        "title": title,
        "description": format!("All about {title}"),
    })
}

pub fn comment(id: i64, text: &str, created_at: i64) -> Value {
    json!({
        "id": id,
        "username": format!("user_{id}"),
        "text": text,
        "created_at": created_at,
    })
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default)]
    limit: usize,
    #[serde(default)]
    subfeddit_id: i64,
}

async fn version_route(State(fixture): State<FedditFixture>) -> Json<Value> {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({"version": "0.1.0"}))
}

async fn subfeddits_route(
    State(fixture): State<FedditFixture>,
    Query(q): Query<PageQuery>,
) -> Json<Value> {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    let batch: Vec<Value> = fixture
        .subfeddits
        .iter()
        .skip(q.skip)
        .take(q.limit)
        .cloned()
        .collect();
    Json(json!({"skip": q.skip, "limit": q.limit, "subfeddits": batch}))
}

async fn comments_route(
    State(fixture): State<FedditFixture>,
    Query(q): Query<PageQuery>,
) -> Response {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    match fixture.mode {
        FedditMode::FailingComments => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        FedditMode::MalformedComments => "definitely not json".into_response(),
        FedditMode::Normal => {
            let batch: Vec<Value> = fixture
                .comments
                .iter()
                .skip(q.skip)
                .take(q.limit)
                .cloned()
                .collect();
            Json(json!({
                "subfeddit_id": q.subfeddit_id,
                "skip": q.skip,
                "limit": q.limit,
                "comments": batch,
            }))
            .into_response()
        }
    }
}

pub fn feddit_router(fixture: FedditFixture) -> Router {
    Router::new()
        .route("/api/v1/version", get(version_route))
        .route("/api/v1/subfeddits/", get(subfeddits_route))
        .route("/api/v1/comments/", get(comments_route))
        .with_state(fixture)
}

#[derive(Clone)]
pub struct ClassifierFixture {
    /// text -> (positive, neutral, negative); unmatched texts answer 500.
    pub scores: Arc<HashMap<String, (f64, f64, f64)>>,
    pub hits: Arc<AtomicUsize>,
}

impl ClassifierFixture {
    pub fn new(scores: &[(&str, (f64, f64, f64))]) -> Self {
        Self {
            scores: Arc::new(
                scores
                    .iter()
                    .map(|(text, triple)| (text.to_string(), *triple))
                    .collect(),
            ),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn classify_route(
    State(fixture): State<ClassifierFixture>,
    Json(body): Json<Value>,
) -> Response {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    let text = body["inputs"].as_str().unwrap_or_default();
    match fixture.scores.get(text) {
        Some((positive, neutral, negative)) => Json(json!([[
            {"label": "positive", "score": positive},
            {"label": "neutral", "score": neutral},
            {"label": "negative", "score": negative},
        ]]))
        .into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub fn classifier_router(fixture: ClassifierFixture) -> Router {
    Router::new()
        .route("/models/{*model}", post(classify_route))
        .with_state(fixture)
}

pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}

/// Address of a port where nothing is listening.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn feddit_config(addr: SocketAddr, page_size: u32) -> FedditConfig {
    FedditConfig {
        base_url: format!("http://{addr}"),
        page_size,
        timeout_secs: 5,
    }
}

pub fn classifier_config(addr: SocketAddr) -> ClassifierConfig {
    ClassifierConfig {
        base_url: format!("http://{addr}"),
        model: "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string(),
        max_concurrent: 4,
        timeout_secs: 5,
        api_key: "test-key".to_string(),
    }
}
