#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bina_api::{AppState, MlState, api_router, ml_router};
use bina_auth::TokenSigner;
use bina_config::ModelConfig;
use bina_core::enums::ModelVariant;
use bina_db::service::BinaService;
use bina_scoring::RiskEngine;
use chrono::TimeDelta;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub fn engine(dir: &TempDir, enabled: bool) -> Arc<RiskEngine> {
    Arc::new(RiskEngine::new(ModelConfig {
        enabled,
        dir: dir.path().display().to_string(),
        epochs: 5,
        ..ModelConfig::default()
    }))
}

/// Enabled engine on the compact network, trained cold on first use.
pub fn network_engine(dir: &TempDir) -> Arc<RiskEngine> {
    Arc::new(RiskEngine::new(ModelConfig {
        enabled: true,
        dir: dir.path().display().to_string(),
        variant: ModelVariant::Compact,
        epochs: 5,
        ..ModelConfig::default()
    }))
}

pub struct TestApi {
    pub router: Router,
    /// Holds the model directory for the lifetime of the test.
    pub dir: TempDir,
}

pub async fn api() -> TestApi {
    api_with(|dir| engine(dir, false)).await
}

pub async fn api_with_network() -> TestApi {
    api_with(network_engine).await
}

async fn api_with(build: impl FnOnce(&TempDir) -> Arc<RiskEngine>) -> TestApi {
    let dir = tempfile::tempdir().unwrap();
    let db = BinaService::new_local(":memory:").await.unwrap();
    let signer = TokenSigner::new(SECRET, TimeDelta::hours(24));
    let state = AppState::new(db, signer, build(&dir));
    TestApi {
        router: api_router(state, &["http://localhost:3000".to_string()]),
        dir,
    }
}

pub fn ml(enabled: bool) -> TestApi {
    let dir = tempfile::tempdir().unwrap();
    let state = MlState {
        engine: engine(&dir, enabled),
    };
    TestApi {
        router: ml_router(state, &["*".to_string()]),
        dir,
    }
}

pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(path)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder.body(Body::from(serde_json::to_vec(&json).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register `email` and return its access token.
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "Rahasia123!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn create_child(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/children",
        Some(token),
        Some(json!({ "name": name, "age": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

/// Start an assessment and return `(assessment_id, items)`.
pub async fn start(app: &Router, token: &str, child_id: i64) -> (i64, Vec<Value>) {
    let (status, body) = request(
        app,
        "POST",
        "/assessments/start",
        Some(token),
        Some(json!({ "child_id": child_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (
        body["assessment_id"].as_i64().unwrap(),
        body["items"].as_array().unwrap().clone(),
    )
}

/// The correct answer for a served item.
pub fn correct_answer(item: &Value) -> String {
    let prompt = item["prompt"].as_str().unwrap();
    match item["item_type"].as_str().unwrap() {
        "arrange" => prompt.rsplit("->").next().unwrap().trim().to_lowercase(),
        "letter" => prompt.to_lowercase(),
        _ => prompt.to_uppercase(),
    }
}
