pub mod assessments;
pub mod auth;
pub mod children;
pub mod dashboard;
pub mod ml;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde_json::{Value, json};

use crate::state::{AppState, MlState};

pub const API_SERVICE_NAME: &str = "BinaKata API";

async fn root() -> Json<Value> {
    Json(json!({ "ok": true, "service": API_SERVICE_NAME }))
}

/// Screening API routes, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/children",
            get(children::list_children).post(children::create_child),
        )
        .route("/children/:id/assessments", get(children::child_assessments))
        .route("/assessments/start", post(assessments::start))
        .route("/assessments/submit", post(assessments::submit))
        .route("/assessments/:id", get(assessments::get_assessment))
        .route("/dashboard/summary", get(dashboard::summary))
}

/// Scoring service routes, without middleware.
pub fn ml_routes() -> Router<MlState> {
    Router::new()
        .route("/", get(ml::info))
        .route("/health", get(ml::health))
        .route("/predict", post(ml::predict))
        .route("/train", post(ml::train))
}
