use axum::Json;
use axum::extract::State;
use bina_core::responses::DashboardSummary;

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::state::AppState;

pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(state.db.dashboard_summary(user.id).await?))
}
