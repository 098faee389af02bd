use axum::extract::{Extension, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{AuthUser, BearerToken};
use crate::database::AuthenticatedRepository;
use crate::filter::{QueryFilters, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::{parse_date, require_fields, user_client};

const TABLE: &str = "movimentacoes_insumos";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub insumo_id: Option<i64>,
    pub tipo: Option<String>,
    #[serde(rename = "dataInicio")]
    pub data_inicio: Option<String>,
    #[serde(rename = "dataFim")]
    pub data_fim: Option<String>,
}

/// GET /api/movimentacoes-insumos - input movements. Filters compose as
/// AND predicates; the date range is inclusive on both ends.
pub async fn list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Value>> {
    let mut filters = QueryFilters::new();
    if let Some(insumo_id) = query.insumo_id {
        filters = filters.eq("insumo_id", insumo_id)?;
    }
    if let Some(ref tipo) = query.tipo {
        filters = filters.eq("tipo", tipo)?;
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

/// POST /api/movimentacoes-insumos
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<BearerToken>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["insumo_id", "tipo", "quantidade"])?;

    let repository = AuthenticatedRepository::new(user_client(&state, &token), TABLE)?;
    let row = repository.create(payload, Some(user.id)).await?;
    Ok(ApiResponse::created(row))
}
