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

const TABLE: &str = "manutencoes";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub veiculo: Option<String>,
    #[serde(rename = "dataInicio")]
    pub data_inicio: Option<String>,
    #[serde(rename = "dataFim")]
    pub data_fim: Option<String>,
}

/// GET /api/manutencoes - maintenance records, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Value>> {
    let mut filters = QueryFilters::new();
    if let Some(ref veiculo) = query.veiculo {
        filters = filters.eq("veiculo", veiculo)?;
    }
    if let Some(ref raw) = query.data_inicio {
        filters = filters.gte("data", parse_date("dataInicio", raw)?)?;
    }
    if let Some(ref raw) = query.data_fim {
        filters = filters.lte("data", parse_date("dataFim", raw)?)?;
    }
    filters = filters.order("data", SortDirection::Desc)?;

    let rows = user_client(&state, &token)
        .from(TABLE)?
        .with_filters(filters)
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/manutencoes
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<BearerToken>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["veiculo", "descricao", "data"])?;

    let repository = AuthenticatedRepository::new(user_client(&state, &token), TABLE)?;
    let row = repository.create(payload, Some(user.id)).await?;
    Ok(ApiResponse::created(row))
}

/// PUT /api/manutencoes
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

/// DELETE /api/manutencoes?id=<id>
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
