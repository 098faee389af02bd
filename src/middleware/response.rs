use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper that renders handler output in the `{success, data, count?}`
/// envelope every route shares.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    status: StatusCode,
    count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data, status: StatusCode::OK, count: None }
    }

    pub fn created(data: T) -> Self {
        Self { data, status: StatusCode::CREATED, count: None }
    }
}

impl ApiResponse<Vec<Value>> {
    /// Listings carry the row count alongside the data.
    pub fn list(data: Vec<Value>) -> Self {
        let count = data.len();
        Self { data, status: StatusCode::OK, count: Some(count) }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Falha ao serializar a resposta"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data,
        });
        if let Some(count) = self.count {
            envelope["count"] = json!(count);
        }

        (self.status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
