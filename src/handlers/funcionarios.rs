use axum::extract::{Extension, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::filter::{QueryFilters, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::{require_fields, require_id, service_client, take_id, IdQuery};

// Employee records carry no per-user row security, so these handlers go
// through the service-tier client. The auth layer still gates access.
const TABLE: &str = "funcionarios";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub ativo: Option<bool>,
    pub cargo: Option<String>,
}

/// GET /api/funcionarios
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Value>> {
    let mut filters = QueryFilters::new();
    if let Some(ativo) = query.ativo {
        filters = filters.eq("ativo", ativo)?;
    }
    if let Some(ref cargo) = query.cargo {
        filters = filters.eq("cargo", cargo)?;
    }
    filters = filters.order("nome", SortDirection::Asc)?;

    let rows = service_client(&state)
        .from(TABLE)?
        .with_filters(filters)
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/funcionarios
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["nome", "cargo"])?;

    if let Some(obj) = payload.as_object_mut() {
        obj.insert("criado_por".to_string(), json!(user.id.to_string()));
    }
    let row = service_client(&state)
        .from(TABLE)?
        .insert(payload)
        .await?;
    Ok(ApiResponse::created(row))
}

/// PUT /api/funcionarios
pub async fn update(
    State(state): State<AppState>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Value> {
    let id = take_id(&mut payload)?;

    let row = service_client(&state)
        .from(TABLE)?
        .eq("id", id)?
        .update(payload)
        .await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/funcionarios?id=<id>
pub async fn remove(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Value> {
    let id = require_id(&query)?;

    service_client(&state)
        .from(TABLE)?
        .eq("id", id)?
        .delete()
        .await?;
    Ok(ApiResponse::success(json!({ "id": id })))
}
