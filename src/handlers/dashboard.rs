use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::auth::BearerToken;
use crate::filter::SortDirection;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::user_client;

/// GET /api/dashboard/resumo - summary across several tables, read as a
/// concurrent fan-out. A failure in any one read fails the whole request;
/// partial results are never returned.
pub async fn resumo(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> ApiResult<Value> {
    let client = user_client(&state, &token);

    let safras = client
        .from("safras")?
        .order("data_inicio", SortDirection::Desc)?
        .select();
    let estoque_insumos = client
        .from("estoque_insumos")?
        .order("atualizado_em", SortDirection::Desc)?
        .select();
    let estoque_combustivel = client
        .from("estoque_combustivel")?
        .order("atualizado_em", SortDirection::Desc)?
        .select();
    let ultimas_colheitas = client
        .from("colheitas")?
        .order("data_colheita", SortDirection::Desc)?
        .limit(10)
        .select();

    let (safras, estoque_insumos, estoque_combustivel, ultimas_colheitas) =
        futures::try_join!(safras, estoque_insumos, estoque_combustivel, ultimas_colheitas)?;

    Ok(ApiResponse::success(json!({
        "safras": safras,
        "estoque_insumos": estoque_insumos,
        "estoque_combustivel": estoque_combustivel,
        "ultimas_colheitas": ultimas_colheitas,
    })))
}
