pub mod colheitas;
pub mod combustivel;
pub mod compras;
pub mod dashboard;
pub mod estoque_insumos;
pub mod funcionarios;
pub mod insumos;
pub mod manutencoes;
pub mod movimentacoes_insumos;
pub mod plantios;
pub mod safras;
pub mod talhoes;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::BearerToken;
use crate::database::DataClient;
use crate::error::ApiError;
use crate::AppState;

/// Fresh per-request handle acting as the caller.
pub(crate) fn user_client(state: &AppState, token: &BearerToken) -> DataClient {
    DataClient::for_user(&state.config.data_service, &state.http, &token.0)
}

/// High-privilege handle for tables that carry no per-user row security.
/// Only reachable behind the auth layer.
pub(crate) fn service_client(state: &AppState) -> DataClient {
    DataClient::service(&state.config.data_service, &state.http)
}

/// Presence check for required fields; null counts as absent.
pub(crate) fn require_fields(payload: &Value, fields: &[&str]) -> Result<(), ApiError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("Corpo da requisição deve ser um objeto JSON"))?;

    for field in fields {
        if obj.get(*field).map_or(true, Value::is_null) {
            return Err(ApiError::validation(format!(
                "Campo obrigatório ausente: {}",
                field
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdQuery {
    pub id: Option<String>,
}

pub(crate) fn require_id(query: &IdQuery) -> Result<&str, ApiError> {
    query
        .id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Parâmetro obrigatório ausente: id"))
}

/// Pull the record id out of an update payload, leaving the remaining
/// fields as the patch. Accepts string or numeric ids.
pub(crate) fn take_id(payload: &mut Value) -> Result<String, ApiError> {
    let obj = payload
        .as_object_mut()
        .ok_or_else(|| ApiError::validation("Corpo da requisição deve ser um objeto JSON"))?;

    let id = match obj.remove("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ApiError::validation("Campo obrigatório ausente: id")),
    };
    Ok(id)
}

pub(crate) fn parse_date(name: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Data inválida em {}: {}", name, raw)))
}

pub(crate) fn parse_decimal(name: &str, raw: &str) -> Result<Decimal, ApiError> {
    raw.parse::<Decimal>()
        .map_err(|_| ApiError::validation(format!("Valor numérico inválido em {}: {}", name, raw)))
}
