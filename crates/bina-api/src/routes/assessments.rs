//! Assessment lifecycle: start with the fixed item set, submit once, read back.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use bina_core::catalog::screening_items;
use bina_core::entities::AssessmentItem;
use bina_core::enums::ItemType;
use bina_core::responses::AssessmentDetail;
use bina_scoring::grading::{SubmittedAnswer, grade_answers};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub child_id: i64,
}

/// An item as shown to the child: no answer or correctness.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemOut {
    pub id: i64,
    pub item_type: ItemType,
    pub prompt: String,
    pub position: i64,
}

impl From<&AssessmentItem> for ItemOut {
    fn from(item: &AssessmentItem) -> Self {
        Self {
            id: item.id,
            item_type: item.item_type,
            prompt: item.prompt.clone(),
            position: item.position,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartResponse {
    pub assessment_id: i64,
    pub items: Vec<ItemOut>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub assessment_id: i64,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SubmitResponse {
    pub id: i64,
    pub risk_score: f64,
    pub recommendation: String,
}

pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<StartRequest>,
) -> ApiResult<Json<StartResponse>> {
    state.db.get_child_for_parent(body.child_id, user.id).await?;
    let detail = state
        .db
        .start_assessment(body.child_id, &screening_items())
        .await?;

    Ok(Json(StartResponse {
        assessment_id: detail.assessment.id,
        items: detail.items.iter().map(ItemOut::from).collect(),
    }))
}

pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    let assessment = state
        .db
        .get_assessment_for_parent(body.assessment_id, user.id)
        .await?;
    if assessment.is_submitted() {
        return Err(ApiError::conflict("Assessment already submitted"));
    }

    let items = state.db.list_items(assessment.id).await?;
    let outcome = grade_answers(&items, &body.answers);
    let features = outcome.features();

    let engine = Arc::clone(&state.engine);
    let prediction = tokio::task::spawn_blocking(move || engine.predict(&features)).await??;

    let saved = state
        .db
        .complete_assessment(
            assessment.id,
            &outcome.grades,
            prediction.risk_score,
            &prediction.recommendation,
        )
        .await?;
    tracing::info!(
        assessment_id = saved.id,
        risk_score = prediction.risk_score,
        model_used = %prediction.model_used,
        "assessment scored"
    );

    Ok(Json(SubmitResponse {
        id: saved.id,
        risk_score: prediction.risk_score,
        recommendation: prediction.recommendation,
    }))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(assessment_id): Path<i64>,
) -> ApiResult<Json<AssessmentDetail>> {
    Ok(Json(state.db.get_assessment_detail(assessment_id, user.id).await?))
}
