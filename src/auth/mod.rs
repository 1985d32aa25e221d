pub mod permission;
pub mod routes;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub use permission::{derive_permission, Permission};
pub use routes::{is_exempt, is_global, tenant_url_from_path};

/// Authenticated identity attached to a request by the authentication
/// middleware. Immutable for the rest of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Handlers take `Profile` as an argument. It is always present behind the
/// authentication middleware, so a missing profile is a gateway bug (500),
/// never a client error.
#[async_trait]
impl<S> FromRequestParts<S> for Profile
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Profile>().cloned().ok_or_else(|| {
            ApiError::internal_server_error(
                "authenticated profile missing from request context",
                "Internal server error",
            )
        })
    }
}

/// Bearer token from the Authorization header. Anything other than
/// `Bearer <token>` yields an empty string.
pub fn bearer_token(headers: &HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .unwrap_or_default()
}
