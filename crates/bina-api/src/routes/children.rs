use axum::Json;
use axum::extract::{Path, State};
use bina_core::entities::{Assessment, Child};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChildCreate {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChildOut {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
}

impl From<Child> for ChildOut {
    fn from(child: Child) -> Self {
        Self {
            id: child.id,
            name: child.name,
            age: child.age,
        }
    }
}

pub async fn list_children(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ChildOut>>> {
    let children = state.db.list_children(user.id).await?;
    Ok(Json(children.into_iter().map(ChildOut::from).collect()))
}

pub async fn create_child(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ChildCreate>,
) -> ApiResult<Json<ChildOut>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name must not be empty"));
    }
    if body.age.is_some_and(|age| age < 0) {
        return Err(ApiError::bad_request("Age must not be negative"));
    }
    let child = state.db.create_child(user.id, name, body.age).await?;
    Ok(Json(child.into()))
}

pub async fn child_assessments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<i64>,
) -> ApiResult<Json<Vec<Assessment>>> {
    Ok(Json(state.db.list_assessments_for_child(child_id, user.id).await?))
}
