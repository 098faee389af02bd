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

const ESTOQUE_TABLE: &str = "estoque_combustivel";
const ABASTECIMENTO_TABLE: &str = "abastecimentos";

/// GET /api/estoque-combustivel - fuel stock per tank/type
pub async fn estoque_list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> ApiResult<Vec<Value>> {
    let rows = user_client(&state, &token)
        .from(ESTOQUE_TABLE)?
        .order("atualizado_em", SortDirection::Desc)?
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/estoque-combustivel - set the stock level for a fuel type;
/// one row per type, merged on conflict.
pub async fn estoque_upsert(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["tipo", "quantidade"])?;

    if let Some(obj) = payload.as_object_mut() {
        obj.insert(
            "atualizado_em".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }

    let row = user_client(&state, &token)
        .from(ESTOQUE_TABLE)?
        .upsert(payload)
        .await?;
    Ok(ApiResponse::created(row))
}

#[derive(Debug, Deserialize)]
pub struct AbastecimentoListQuery {
    pub veiculo: Option<String>,
    #[serde(rename = "dataInicio")]
    pub data_inicio: Option<String>,
    #[serde(rename = "dataFim")]
    pub data_fim: Option<String>,
}

/// GET /api/abastecimentos - fuel fill-ups, newest first
pub async fn abastecimento_list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<AbastecimentoListQuery>,
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
        .from(ABASTECIMENTO_TABLE)?
        .with_filters(filters)
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/abastecimentos
pub async fn abastecimento_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(token): Extension<BearerToken>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["veiculo", "quantidade", "data"])?;

    let repository =
        AuthenticatedRepository::new(user_client(&state, &token), ABASTECIMENTO_TABLE)?;
    let row = repository.create(payload, Some(user.id)).await?;
    Ok(ApiResponse::created(row))
}
