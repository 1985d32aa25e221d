use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::api::types::ErrorResponse;

/// Successful JSON response with its status code. The body is written as-is;
/// each handler group shapes its own resource envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub body: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK, for reads, updates and deletes
    pub fn success(body: T) -> Self {
        Self::with_status(body, StatusCode::OK)
    }

    /// 201 Created
    pub fn created(body: T) -> Self {
        Self::with_status(body, StatusCode::CREATED)
    }

    pub fn with_status(body: T, status_code: StatusCode) -> Self {
        Self { body, status_code }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.body) {
            Ok(value) => (self.status_code, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(e.to_string(), "Failed to serialize response")),
                )
                    .into_response()
            }
        }
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
