use axum::extract::{Extension, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthUser, BearerToken};
use crate::database::AuthenticatedRepository;
use crate::filter::{QueryFilters, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::{parse_date, require_fields, require_id, take_id, user_client, IdQuery};

const TABLE: &str = "colheitas";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub talhao_id: Option<i64>,
    pub safra_id: Option<i64>,
    #[serde(rename = "dataInicio")]
    pub data_inicio: Option<String>,
    #[serde(rename = "dataFim")]
    pub data_fim: Option<String>,
}

/// GET /api/colheitas - harvests, newest first; date range inclusive
pub async fn list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Value>> {
    let mut filters = QueryFilters::new();
    if let Some(talhao_id) = query.talhao_id {
        filters = filters.eq("talhao_id", talhao_id)?;
    }
    if let Some(safra_id) = query.safra_id {
        filters = filters.eq("safra_id", safra_id)?;
    }
    if let Some(ref raw) = query.data_inicio {
        filters = filters.gte("data_colheita", parse_date("dataInicio", raw)?)?;
    }
    if let Some(ref raw) = query.data_fim {
        filters = filters.lte("data_colheita", parse_date("dataFim", raw)?)?;
    }
    filters = filters.order("data_colheita", SortDirection::Desc)?;

    let rows = user_client(&state, &token)
        .from(TABLE)?
        .with_filters(filters)
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/colheitas
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<BearerToken>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["talhao_id", "safra_id", "quantidade"])?;

    let repository = AuthenticatedRepository::new(user_client(&state, &token), TABLE)?;
    let row = repository.create(payload, Some(user.id)).await?;
    Ok(ApiResponse::created(row))
}

/// PUT /api/colheitas
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

/// DELETE /api/colheitas?id=<id>
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
