use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::DataClient;
use crate::AppState;

/// Identity resolved by the remote auth endpoint. Lives for one request;
/// never persisted or cached by this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
}

/// Raw bearer token as presented by the caller, carried alongside the
/// resolved identity for routes that open a per-user data client.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Pure parse of the `Authorization` header. `None` for a missing header,
/// a non-Bearer scheme, or an empty token; never an error.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the caller's identity by forwarding the bearer token to the
/// remote verification endpoint. Absence of identity is a normal value.
pub async fn authenticate_request(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_bearer_token(headers)?;
    DataClient::for_user(&state.config.data_service, &state.http, &token)
        .verify_token()
        .await
}
