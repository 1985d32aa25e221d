// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::types::ErrorResponse;
use crate::rpc::{status::http_status_for, RpcError};

/// HTTP API error. Every variant renders as the uniform
/// `{"error", "message", "status": "error"}` envelope.
///
/// `error` holds the short cause (backend message, rejection text);
/// `message` holds the handler's description of what failed.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest { error: String, message: String },

    // 401 Unauthorized
    Unauthorized { error: String, message: String },

    // 403 Forbidden
    Forbidden { error: String, message: String },

    // 404 Not Found
    NotFound { error: String, message: String },

    // 409 Conflict
    Conflict { error: String, message: String },

    // 500 Internal Server Error
    InternalServerError { error: String, message: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error(&self) -> &str {
        match self {
            ApiError::BadRequest { error, .. }
            | ApiError::Unauthorized { error, .. }
            | ApiError::Forbidden { error, .. }
            | ApiError::NotFound { error, .. }
            | ApiError::Conflict { error, .. }
            | ApiError::InternalServerError { error, .. } => error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Forbidden { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::InternalServerError { message, .. } => message,
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.error(), self.message())
    }

    /// Translate a backend call failure into an HTTP error.
    ///
    /// Structured statuses go through the shared code table; anything else
    /// (transport, local deadline, codec) is a 500 carrying the raw error text.
    /// An empty backend message falls back to `message`.
    pub fn from_rpc(err: &RpcError, message: impl Into<String>) -> Self {
        let message = message.into();
        match err.status() {
            Some(status) => {
                let error = if status.message().is_empty() {
                    message.clone()
                } else {
                    status.message().to_string()
                };
                Self::with_status(http_status_for(status.code()), error, message)
            }
            None => ApiError::internal_server_error(err.to_string(), message),
        }
    }

    fn with_status(code: StatusCode, error: String, message: String) -> Self {
        match code {
            StatusCode::BAD_REQUEST => ApiError::BadRequest { error, message },
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { error, message },
            StatusCode::FORBIDDEN => ApiError::Forbidden { error, message },
            StatusCode::NOT_FOUND => ApiError::NotFound { error, message },
            StatusCode::CONFLICT => ApiError::Conflict { error, message },
            _ => ApiError::InternalServerError { error, message },
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest { error: error.into(), message: message.into() }
    }

    /// 400 for a required field that is absent or empty.
    pub fn missing_field(field: &str) -> Self {
        ApiError::bad_request(format!("{} is required", field), "Invalid request")
    }

    pub fn unauthorized(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Unauthorized { error: error.into(), message: message.into() }
    }

    pub fn forbidden(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Forbidden { error: error.into(), message: message.into() }
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NotFound { error: error.into(), message: message.into() }
    }

    pub fn conflict(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Conflict { error: error.into(), message: message.into() }
    }

    pub fn internal_server_error(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InternalServerError { error: error.into(), message: message.into() }
    }
}

// Extractor rejections become 400s in the standard envelope instead of
// axum's plain-text bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text(), "Invalid request body")
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text(), "Invalid path parameters")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text(), "Invalid query parameters")
    }
}

impl From<crate::resource_uri::ResourceUriError> for ApiError {
    fn from(err: crate::resource_uri::ResourceUriError) -> Self {
        ApiError::bad_request(err.to_string(), "Invalid resource URI")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.message(), self.error())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), cause = %self.error(), "{}", self.message());
        } else {
            tracing::warn!(status = status.as_u16(), cause = %self.error(), "{}", self.message());
        }
        (status, Json(self.to_body())).into_response()
    }
}
