use axum::extract::{Extension, State};
use axum::Json;
use serde_json::Value;

use crate::auth::BearerToken;
use crate::filter::SortDirection;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

use super::{require_fields, user_client};

const TABLE: &str = "estoque_insumos";

/// GET /api/estoque-insumos - current stock per input, most recently
/// updated first
pub async fn list(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> ApiResult<Vec<Value>> {
    let rows = user_client(&state, &token)
        .from(TABLE)?
        .order("atualizado_em", SortDirection::Desc)?
        .select()
        .await?;
    Ok(ApiResponse::list(rows))
}

/// POST /api/estoque-insumos - set the stock level for an input. The table
/// keeps one row per input, so the write merges on the conflict target and
/// `atualizado_em` is stamped here before it goes out.
pub async fn create(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Value> {
    require_fields(&payload, &["insumo_id", "quantidade"])?;

    if let Some(obj) = payload.as_object_mut() {
        obj.insert(
            "atualizado_em".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }

    let row = user_client(&state, &token)
        .from(TABLE)?
        .upsert(payload)
        .await?;
    Ok(ApiResponse::created(row))
}
