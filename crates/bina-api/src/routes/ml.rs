//! Scoring service endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use bina_scoring::{LabeledSample, Prediction, RetrainOutcome, RiskFeatures};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::MlState;

pub const ML_SERVICE_NAME: &str = "BinaKata ML Service";
/// Wire version of the scoring service, independent of the crate version.
pub const ML_SERVICE_VERSION: &str = "2.0.0";

const fn default_epochs() -> usize {
    30
}

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub samples: Vec<LabeledSample>,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub nn_available: bool,
    pub model_loaded: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub nn_available: bool,
    pub model_type: String,
    pub trained_at: Option<String>,
    pub variant: String,
    pub version: String,
}

pub async fn predict(
    State(state): State<MlState>,
    Json(features): Json<RiskFeatures>,
) -> ApiResult<Json<Prediction>> {
    let engine = Arc::clone(&state.engine);
    let prediction = tokio::task::spawn_blocking(move || engine.predict(&features)).await??;
    Ok(Json(prediction))
}

pub async fn train(
    State(state): State<MlState>,
    Json(body): Json<TrainRequest>,
) -> ApiResult<Json<RetrainOutcome>> {
    let engine = Arc::clone(&state.engine);
    let epochs = body.epochs.max(1);
    let outcome = tokio::task::spawn_blocking(move || engine.retrain(&body.samples, epochs)).await??;
    tracing::info!(
        samples_added = outcome.samples_added,
        retrained = outcome.retrained,
        "train request handled"
    );
    Ok(Json(outcome))
}

pub async fn health(State(state): State<MlState>) -> Json<HealthResponse> {
    let status = state.engine.status();
    Json(HealthResponse {
        status: "healthy".into(),
        service: ML_SERVICE_NAME.into(),
        nn_available: status.nn_available,
        model_loaded: status.model_loaded,
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn info(State(state): State<MlState>) -> Json<ServiceInfo> {
    let status = state.engine.status();
    Json(ServiceInfo {
        service: ML_SERVICE_NAME.into(),
        status: "ready".into(),
        nn_available: status.nn_available,
        model_type: status.model_type,
        trained_at: status.trained_at,
        variant: status.variant.to_string(),
        version: ML_SERVICE_VERSION.into(),
    })
}
