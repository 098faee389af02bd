use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{authenticate_request, extract_bearer_token, BearerToken};
use crate::error::ApiError;
use crate::AppState;

/// Authentication layer for protected routes. Runs the authenticator first;
/// on failure short-circuits with 401 before any handler (and therefore any
/// write) runs. On success the resolved identity and the raw token are
/// attached to the request for the inner handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(request.headers()) else {
        return ApiError::unauthorized("Token não encontrado").into_response();
    };

    match authenticate_request(&state, request.headers()).await {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "authenticated request");
            request.extensions_mut().insert(user);
            request.extensions_mut().insert(BearerToken(token));
            next.run(request).await
        }
        None => ApiError::unauthorized("Token inválido").into_response(),
    }
}
