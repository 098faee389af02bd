// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::client::DataServiceError;
use crate::filter::FilterError;

/// Tagged error kinds so every caller maps deterministically to a status
/// code instead of matching on message strings.
#[derive(Debug)]
pub enum ApiError {
    /// 400 - missing or malformed request fields
    Validation(String),
    /// 401 - missing, malformed, or rejected bearer token
    Unauthorized(String),
    /// 404 - record or route does not exist
    NotFound(String),
    /// 500 - the remote data service reported a failure
    Upstream(String),
    /// 500 - anything else (serialization, configuration)
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message. Upstream and internal details are logged at the
    /// conversion site, never returned to the caller.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Upstream(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<DataServiceError> for ApiError {
    fn from(err: DataServiceError) -> Self {
        match err {
            DataServiceError::Upstream { status, message } => {
                tracing::error!("data service error ({}): {}", status, message);
                ApiError::Upstream("Erro ao acessar o serviço de dados".to_string())
            }
            DataServiceError::Transport(e) => {
                tracing::error!("data service unreachable: {}", e);
                ApiError::Upstream("Erro ao acessar o serviço de dados".to_string())
            }
            DataServiceError::InvalidResponse(msg) => {
                tracing::error!("unexpected data service response: {}", msg);
                ApiError::Internal("Resposta inesperada do serviço de dados".to_string())
            }
            DataServiceError::Unfiltered(op) => {
                tracing::error!("refused unfiltered {} statement", op);
                ApiError::Validation("Identificador do registro ausente".to_string())
            }
            DataServiceError::InvalidUrl(e) => {
                tracing::error!("could not build data service URL: {}", e);
                ApiError::Internal("Erro de configuração do serviço de dados".to_string())
            }
            DataServiceError::Filter(e) => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic conversion to the `{success:false, error}` envelope
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "success": false,
            "error": self.message(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
