use axum::extract::{Extension, Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{AuthUser, BearerToken};
use crate::database::{AuthenticatedRepository, ListOptions};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::{require_fields, require_id, take_id, user_client, IdQuery};

const TABLE: &str = "safras";

/// GET /api/safras - seasons, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> ApiResult<Vec<Value>> {
    let repository = AuthenticatedRepository::new(user_client(&state, &token), TABLE)?;
    let rows = repository.find_all(&ListOptions::desc("data_inicio")).await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/safras
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<BearerToken>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["nome", "data_inicio"])?;

    let repository = AuthenticatedRepository::new(user_client(&state, &token), TABLE)?;
    let row = repository.create(payload, Some(user.id)).await?;
    Ok(ApiResponse::created(row))
}

/// PUT /api/safras - update by id carried in the body
pub async fn update(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Value> {
    let id = take_id(&mut payload)?;

    let row = user_client(&state, &token)
        .from(TABLE)?
        .eq("id", id)?
        .update(payload)
        .await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/safras?id=<id>
pub async fn remove(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Value> {
    let id = require_id(&query)?;

    user_client(&state, &token)
        .from(TABLE)?
        .eq("id", id)?
        .delete()
        .await?;
    Ok(ApiResponse::success(json!({ "id": id })))
}
